//! Application error taxonomy and its HTTP mapping.
//!
//! Domain outcomes (`Conflict`, `NotFound`, `Disabled`) surface as 4xx responses.
//! I/O failures against the durable store or the fast cache surface as 500 with a
//! short message; internal details are logged, never returned to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::infrastructure::cache::CacheError;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,

    /// Existing short URL, only present on `409 Conflict`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Request payload failed validation.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The original URL has already been shortened.
    ///
    /// `short_url` carries the existing mapping when it could be looked up.
    #[error("URL already exists")]
    Conflict { short_url: Option<String> },

    /// No record exists for the short id.
    #[error("URL not found: {id}")]
    NotFound { id: String },

    /// The record exists but has been toggled off.
    #[error("URL is disabled: {id}")]
    Disabled { id: String },

    /// Durable store I/O failure or timeout.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Fast cache I/O failure, timeout or corrupted value.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Failure already reduced to a client-safe message.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn disabled(id: impl Into<String>) -> Self {
        Self::Disabled { id: id.into() }
    }

    pub fn conflict(short_url: Option<String>) -> Self {
        Self::Conflict { short_url }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true for failures of the durable store or the fast cache.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Cache(_) | Self::Internal(_))
    }

    /// Collapses infrastructure failures into a generic, route-specific message.
    ///
    /// Domain outcomes pass through untouched. The original error is logged
    /// before it is replaced.
    pub fn or_internal(self, message: &str) -> Self {
        if self.is_infrastructure() {
            tracing::error!(error = %self, "{}", message);
            Self::internal(message)
        } else {
            self
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, short_url) = match self {
            AppError::Validation { .. } => (
                StatusCode::BAD_REQUEST,
                "Invalid request payload".to_string(),
                None,
            ),
            AppError::Conflict { short_url } => (
                StatusCode::CONFLICT,
                "URL already exists".to_string(),
                short_url,
            ),
            AppError::NotFound { .. } | AppError::Disabled { .. } => {
                (StatusCode::NOT_FOUND, "URL not found".to_string(), None)
            }
            AppError::Storage(_) | AppError::Cache(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            ),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message, None),
        };

        (status, Json(ErrorBody { error, short_url })).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(None);
        }

        AppError::storage(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or(Value::Null);
        AppError::bad_request("Invalid request payload", details)
    }
}
