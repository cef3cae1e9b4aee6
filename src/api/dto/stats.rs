//! DTO for the access statistics endpoint.

use serde::Serialize;

use crate::domain::entities::AccessStats;

/// Access counters for a short id.
///
/// `last_access` is an RFC 3339 timestamp, or `"N/A"` if never accessed.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub access_count: i64,
    pub last_access: String,
}

impl From<AccessStats> for StatsResponse {
    fn from(stats: AccessStats) -> Self {
        Self {
            access_count: stats.access_count,
            last_access: stats.last_access,
        }
    }
}
