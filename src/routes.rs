//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST  /shorten`     - Create a short URL
//! - `GET   /{id}`        - Short link redirect
//! - `PATCH /{id}`        - Enable/disable a short link
//! - `GET   /stats/{id}`  - Access statistics
//! - `GET   /health`      - Health check: DB and cache
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routes with state and tracing applied.
pub fn router(state: AppState) -> Router {
    api::routes::routes()
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service, trimming trailing slashes before routing.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
