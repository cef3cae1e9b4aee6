//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "original_url": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// { "short_url": "http://localhost:8080/100680" }
/// ```
///
/// # Errors
///
/// - 400 if the body is not valid JSON or `original_url` is missing or empty
/// - 409 `{"error": "URL already exists", "short_url": "..."}` if the URL was shortened before
/// - 500 `{"error": "Failed to shorten URL"}` on storage failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::bad_request("Invalid request payload", json!({ "reason": e.body_text() }))
    })?;
    payload.validate()?;

    let short_url = state
        .resolution_service
        .shorten(&payload.original_url)
        .await
        .map_err(|e| e.or_internal("Failed to shorten URL"))?;

    Ok(Json(ShortenResponse { short_url }))
}
