//! API route configuration.

use crate::api::handlers::{
    health_handler, redirect_handler, shorten_handler, stats_handler, toggle_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes.
///
/// # Endpoints
///
/// - `POST  /shorten`     - Shorten a URL
/// - `GET   /health`      - Health check: database and cache
/// - `GET   /stats/{id}`  - Access statistics for a short id
/// - `GET   /{id}`        - Redirect to the original URL
/// - `PATCH /{id}`        - Toggle enabled/disabled
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/health", get(health_handler))
        .route("/stats/{id}", get(stats_handler))
        .route("/{id}", get(redirect_handler).patch(toggle_handler))
}
