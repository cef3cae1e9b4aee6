//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// A missing key is never an error; it is reported as `Ok(None)` by
/// [`CacheService::get`].
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Cache operation error: {0}")]
    Operation(String),

    #[error("Cache operation `{op}` timed out after {timeout:?}")]
    Timeout { op: &'static str, timeout: Duration },

    #[error("Corrupted cache value at {key}: {value:?}")]
    Corrupted { key: String, value: String },
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value fast cache used for short id lookups and access counters.
///
/// Unlike a fail-open cache, implementations report failures to the caller;
/// the services decide which failures are swallowed.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - Process-local fallback
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Reads a value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on hit
    /// - `Ok(None)` when the key is absent or expired
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Writes a value, replacing any previous one.
    ///
    /// `ttl = None` stores the value without expiry.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()>;

    /// Removes a key. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Atomically increments an integer value, creating it at 1 if absent.
    ///
    /// # Errors
    ///
    /// Fails if the stored value is not an integer.
    async fn increment(&self, key: &str) -> CacheResult<i64>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
