//! Access statistics service.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use crate::domain::entities::{AccessStats, LAST_ACCESS_SENTINEL, access_count_key, last_access_key};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheError, CacheService};

/// Tracks per-id access counters in the fast cache.
///
/// Errors are always reported to the caller. Whether a failure matters is
/// decided by the caller: redirects ignore it, the stats endpoint surfaces it.
pub struct StatsService {
    cache: Arc<dyn CacheService>,
}

impl StatsService {
    /// Creates a new statistics service.
    pub fn new(cache: Arc<dyn CacheService>) -> Self {
        Self { cache }
    }

    /// Records one access to `id`.
    ///
    /// Increments `<id>:access_count` and overwrites `<id>:last_access` with the
    /// current UTC time in RFC 3339 (`2024-01-15T10:30:00Z`). Neither key expires.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Cache`] if either write fails. The counter may already
    /// have been incremented when the timestamp write fails.
    pub async fn record_access(&self, id: &str) -> Result<(), AppError> {
        self.cache.increment(&access_count_key(id)).await?;

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.cache.set(&last_access_key(id), &now, None).await?;

        Ok(())
    }

    /// Reads the counters of `id`.
    ///
    /// A missing counter reads as `0` and a missing timestamp as `"N/A"`; the id
    /// is not checked against the durable store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Cache`] on read failure or if the counter holds a
    /// non-integer value.
    pub async fn get_stats(&self, id: &str) -> Result<AccessStats, AppError> {
        let count_key = access_count_key(id);

        let access_count = match self.cache.get(&count_key).await? {
            None => 0,
            Some(raw) if raw.is_empty() => 0,
            Some(raw) => raw.parse::<i64>().map_err(|_| CacheError::Corrupted {
                key: count_key,
                value: raw,
            })?,
        };

        let last_access = self
            .cache
            .get(&last_access_key(id))
            .await?
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| LAST_ACCESS_SENTINEL.to_string());

        Ok(AccessStats {
            access_count,
            last_access,
        })
    }
}
