//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten. Stored and matched verbatim.
    #[validate(length(min = 1, max = 2048, message = "original_url must not be empty"))]
    pub original_url: String,
}

/// Response carrying the generated short URL.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
}
