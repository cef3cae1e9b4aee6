//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct UrlRow {
    id: String,
    original_url: String,
    short_url: String,
    enabled: bool,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord {
            id: row.id,
            original_url: row.original_url,
            short_url: row.short_url,
            enabled: row.enabled,
        }
    }
}

/// PostgreSQL repository for URL records.
///
/// Every query runs under `op_timeout`; expiry surfaces as [`AppError::Storage`].
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
    op_timeout: Duration,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    async fn bounded<T>(
        &self,
        op: &str,
        fut: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> Result<T, AppError> {
        match timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::storage(format!(
                "{} timed out after {:?}",
                op, self.op_timeout
            ))),
        }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert(&self, record: &UrlRecord) -> Result<(), AppError> {
        self.bounded(
            "insert",
            sqlx::query(
                r#"
                INSERT INTO urls (id, original_url, short_url, enabled)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&record.id)
            .bind(&record.original_url)
            .bind(&record.short_url)
            .bind(record.enabled)
            .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = self
            .bounded(
                "find_by_id",
                sqlx::query_as::<_, UrlRow>(
                    "SELECT id, original_url, short_url, enabled FROM urls WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, AppError> {
        let row = self
            .bounded(
                "find_by_original_url",
                sqlx::query_as::<_, UrlRow>(
                    "SELECT id, original_url, short_url, enabled FROM urls WHERE original_url = $1",
                )
                .bind(original_url)
                .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn update_enabled_and_url(
        &self,
        id: &str,
        enabled: bool,
        original_url: &str,
    ) -> Result<(), AppError> {
        let result = self
            .bounded(
                "update_enabled_and_url",
                sqlx::query(
                    r#"
                    UPDATE urls
                    SET enabled = $2, original_url = $3, updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(enabled)
                .bind(original_url)
                .execute(self.pool.as_ref()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(id));
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.bounded(
            "count",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls").fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.bounded(
            "ping",
            sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }
}
