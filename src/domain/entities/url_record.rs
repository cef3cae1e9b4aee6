//! URL record entity, the authoritative mapping held by the durable store.

use serde::{Deserialize, Serialize};

/// A shortened URL mapping.
///
/// Field names are part of the storage contract and must not be renamed.
/// `id` and `short_url` never change once the record exists; only `enabled`
/// is mutated, by toggling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: String,
    pub original_url: String,
    pub short_url: String,
    pub enabled: bool,
}

impl UrlRecord {
    /// Creates a freshly shortened, enabled record.
    pub fn new(id: String, original_url: String, short_url: String) -> Self {
        Self {
            id,
            original_url,
            short_url,
            enabled: true,
        }
    }

    /// Returns the record with `enabled` flipped.
    pub fn toggled(mut self) -> Self {
        self.enabled = !self.enabled;
        self
    }
}
