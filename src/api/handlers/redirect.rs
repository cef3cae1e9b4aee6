//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short id to its original URL.
///
/// # Endpoint
///
/// `GET /{id}`
///
/// # Request Flow
///
/// 1. Check cache for the id
/// 2. On miss (or cache error), query the durable store
/// 3. Refill the cache if the record is enabled
/// 4. Record the access
/// 5. Return 302 Found
///
/// # Errors
///
/// Returns 404 `{"error": "URL not found"}` if the id is unknown or disabled.
pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let original_url = state
        .resolution_service
        .resolve(&id)
        .await
        .map_err(|e| e.or_internal("Failed to resolve URL"))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]).into_response())
}
