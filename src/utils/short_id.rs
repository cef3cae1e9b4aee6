//! Deterministic short id derivation.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
pub const SHORT_ID_LEN: usize = 6;

/// Derives the short id of a URL.
///
/// The id is the first [`SHORT_ID_LEN`] hex characters of the SHA-256 digest of
/// the URL bytes, so the same URL always maps to the same id. Distinct URLs
/// sharing a prefix collide; the store rejects the second insert.
pub fn derive_short_id(original_url: &str) -> String {
    let digest = Sha256::digest(original_url.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(SHORT_ID_LEN);
    id
}

/// Builds the public short URL for an id.
pub fn build_short_url(base_url: &str, id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}
