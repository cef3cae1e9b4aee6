//! Repository trait for URL record data access.

use crate::domain::entities::UrlRecord;
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store holding the authoritative URL records.
///
/// Implementations bound every call with their own timeout; an expired
/// timeout is reported as [`AppError::Storage`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Persists a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] (without a short URL) if the id or the
    /// original URL is already stored.
    /// Returns [`AppError::Storage`] on any other failure.
    async fn insert(&self, record: &UrlRecord) -> Result<(), AppError>;

    /// Finds a record by its short id.
    async fn find_by_id(&self, id: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Finds the record whose `original_url` equals the argument exactly.
    async fn find_by_original_url(&self, original_url: &str)
    -> Result<Option<UrlRecord>, AppError>;

    /// Overwrites `enabled` and `original_url` of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    async fn update_enabled_and_url(
        &self,
        id: &str,
        enabled: bool,
        original_url: &str,
    ) -> Result<(), AppError>;

    /// Counts stored records.
    async fn count(&self) -> Result<i64, AppError>;

    /// Round-trips to the store to verify connectivity.
    async fn ping(&self) -> Result<(), AppError>;
}
