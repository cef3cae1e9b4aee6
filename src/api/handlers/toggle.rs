//! Handler for enabling and disabling short links.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::toggle::ToggleResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Flips the enabled state of a short link.
///
/// # Endpoint
///
/// `PATCH /{id}`
///
/// # Response
///
/// `success` holds the new state: `false` after disabling, `true` after enabling.
///
/// ```json
/// { "success": false }
/// ```
///
/// # Errors
///
/// - 404 if the id is unknown
/// - 500 `{"error": "Failed to update URL state"}` if the store or the cache update fails
pub async fn toggle_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ToggleResponse>, AppError> {
    let enabled = state
        .resolution_service
        .toggle_state(&id)
        .await
        .map_err(|e| e.or_internal("Failed to update URL state"))?;

    Ok(Json(ToggleResponse { success: enabled }))
}
