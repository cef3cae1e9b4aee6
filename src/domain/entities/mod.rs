//! Core domain entities.
//!
//! - [`UrlRecord`] - The authoritative short id to original URL mapping
//! - [`AccessStats`] - Per-id access counters kept in the fast cache

pub mod access_stats;
pub mod url_record;

pub use access_stats::{AccessStats, LAST_ACCESS_SENTINEL, access_count_key, last_access_key};
pub use url_record::UrlRecord;
