//! Access statistics kept alongside cached URLs.
//!
//! Stored as two independent cache keys per short id and never persisted
//! to the durable store.

use serde::Serialize;

/// Rendered in place of `last_access` when an id has never been resolved.
pub const LAST_ACCESS_SENTINEL: &str = "N/A";

/// Cache key of the access counter for `id`.
pub fn access_count_key(id: &str) -> String {
    format!("{id}:access_count")
}

/// Cache key of the last access timestamp for `id`.
pub fn last_access_key(id: &str) -> String {
    format!("{id}:last_access")
}

/// Point-in-time view of the counters for one short id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessStats {
    pub access_count: i64,
    pub last_access: String,
}

impl AccessStats {
    /// Stats for an id that has never been resolved.
    pub fn empty() -> Self {
        Self {
            access_count: 0,
            last_access: LAST_ACCESS_SENTINEL.to_string(),
        }
    }
}
