//! Process-local cache used when Redis is not configured.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-memory [`CacheService`] backed by a sharded concurrent map.
///
/// Expired entries are dropped lazily on access. Contents are lost on restart,
/// which matches the advisory role of the cache.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        debug!("Using MemoryCache (process-local)");
        Self {
            entries: DashMap::new(),
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();

        let found = self
            .entries
            .get(key)
            .map(|entry| (entry.is_expired(now), entry.value.clone()));

        match found {
            Some((false, value)) => Ok(Some(value)),
            Some((true, _)) => {
                self.entries.remove_if(key, |_, entry| entry.is_expired(now));
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn increment(&self, key: &str) -> CacheResult<i64> {
        let now = Instant::now();
        let mut entry = self.entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: "0".to_string(),
            expires_at: None,
        });

        if entry.is_expired(now) {
            entry.value = "0".to_string();
            entry.expires_at = None;
        }

        let current: i64 = entry.value.parse().map_err(|_| CacheError::Corrupted {
            key: key.to_string(),
            value: entry.value.clone(),
        })?;
        let next = current.checked_add(1).ok_or_else(|| {
            CacheError::Operation(format!("increment would overflow at {}", key))
        })?;
        entry.value = next.to_string();

        Ok(next)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
