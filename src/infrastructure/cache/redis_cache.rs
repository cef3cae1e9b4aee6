//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisResult, aio::ConnectionManager};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Redis cache implementation.
///
/// Uses `ConnectionManager` for a shared, auto-reconnecting connection that is
/// cheap to clone per request. Keys are used verbatim so that the layout
/// (`<id>`, `<id>:access_count`, `<id>:last_access`) is visible to other tools.
pub struct RedisCache {
    client: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `connect_timeout` - bound on establishing the connection and the initial PING
    /// - `op_timeout` - bound applied to every subsequent command
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the connection cannot
    /// be established in time, or the PING fails.
    pub async fn connect(
        redis_url: &str,
        connect_timeout: Duration,
        op_timeout: Duration,
    ) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                CacheError::Connection(format!(
                    "Timed out connecting to Redis after {:?}",
                    connect_timeout
                ))
            })?
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        timeout(connect_timeout, test_conn.ping::<()>())
            .await
            .map_err(|_| CacheError::Connection("Redis PING timed out".to_string()))?
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            op_timeout,
        })
    }

    /// Runs one command under the operation timeout.
    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = RedisResult<T>>,
    ) -> CacheResult<T> {
        timeout(self.op_timeout, fut)
            .await
            .map_err(|_| CacheError::Timeout {
                op,
                timeout: self.op_timeout,
            })?
            .map_err(|e| CacheError::Operation(format!("Redis {} failed: {}", op, e)))
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();
        let value = self
            .bounded("GET", conn.get::<_, Option<String>>(key))
            .await?;

        match &value {
            Some(_) => debug!("Cache HIT: {}", key),
            None => debug!("Cache MISS: {}", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        let mut conn = self.client.clone();

        match ttl {
            Some(ttl) => {
                self.bounded("SETEX", conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()))
                    .await?;
                debug!("Cache SET: {} (TTL: {}s)", key, ttl.as_secs());
            }
            None => {
                self.bounded("SET", conn.set::<_, _, ()>(key, value))
                    .await?;
                debug!("Cache SET: {} (no expiry)", key);
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let deleted = self.bounded("DEL", conn.del::<_, i64>(key)).await?;

        if deleted > 0 {
            debug!("Cache DELETE: {}", key);
        }

        Ok(())
    }

    async fn increment(&self, key: &str) -> CacheResult<i64> {
        let mut conn = self.client.clone();
        self.bounded("INCR", conn.incr::<_, _, i64>(key, 1)).await
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        self.bounded("PING", conn.ping::<()>()).await.is_ok()
    }
}
