//! DTO for the toggle endpoint.

use serde::Serialize;

/// New `enabled` state after a toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
}
