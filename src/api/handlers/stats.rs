//! Handler for access statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the access counters of a short id.
///
/// # Endpoint
///
/// `GET /stats/{id}`
///
/// Unknown ids are not an error: they report zero accesses.
///
/// ```json
/// { "access_count": 3, "last_access": "2024-01-15T10:30:00Z" }
/// ```
///
/// # Errors
///
/// Returns 500 `{"error": "Failed to get URL stats"}` if the cache is
/// unreachable or holds a corrupted counter.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state
        .stats_service
        .get_stats(&id)
        .await
        .map_err(|e| e.or_internal("Failed to get URL stats"))?;

    Ok(Json(stats.into()))
}
