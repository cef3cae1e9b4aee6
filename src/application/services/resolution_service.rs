//! Short id resolution: shortening, cache-first lookup and enable/disable toggling.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::application::services::StatsService;
use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::short_id::{build_short_url, derive_short_id};

/// Default lifetime of a cached `id -> original_url` entry.
pub const DEFAULT_URL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Orchestrates the durable store and the fast cache for short links.
///
/// The store is authoritative. The cache is advisory: a hit is trusted without
/// re-checking `enabled`, so a URL cached before it was disabled keeps resolving
/// until the entry expires or is deleted.
///
/// Cache write failures are swallowed (and logged) by [`Self::shorten`] and
/// [`Self::resolve`], but propagated by [`Self::toggle_state`].
pub struct ResolutionService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    stats: Arc<StatsService>,
    base_url: String,
    url_ttl: Duration,
}

impl ResolutionService {
    /// Creates a new resolution service.
    ///
    /// `base_url` is the public prefix of generated short URLs
    /// (e.g. `http://localhost:8080`).
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        stats: Arc<StatsService>,
        base_url: impl Into<String>,
        url_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            stats,
            base_url: base_url.into(),
            url_ttl,
        }
    }

    /// Shortens `original_url` and returns the fully-qualified short URL.
    ///
    /// The caller validates that the URL is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] carrying the existing short URL if the URL
    /// was shortened before.
    /// Returns [`AppError::Storage`] if the lookup or the insert fails.
    pub async fn shorten(&self, original_url: &str) -> Result<String, AppError> {
        if let Some(existing) = self.repository.find_by_original_url(original_url).await? {
            debug!(id = %existing.id, "URL already shortened");
            return Err(AppError::conflict(Some(existing.short_url)));
        }

        let id = derive_short_id(original_url);
        let short_url = build_short_url(&self.base_url, &id);
        let record = UrlRecord::new(id.clone(), original_url.to_string(), short_url.clone());

        match self.repository.insert(&record).await {
            Ok(()) => {}
            Err(AppError::Conflict { .. }) => {
                // Lost a race with a concurrent shorten, or an id prefix collision.
                let existing = self
                    .repository
                    .find_by_original_url(original_url)
                    .await
                    .ok()
                    .flatten()
                    .map(|r| r.short_url);
                return Err(AppError::conflict(existing));
            }
            Err(e) => return Err(e),
        }

        info!(id = %id, "Shortened URL");

        self.populate_cache(&id, original_url).await;

        Ok(short_url)
    }

    /// Resolves a short id to its original URL.
    ///
    /// Every successful resolution records an access; a stats failure is logged
    /// and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the id is unknown.
    /// Returns [`AppError::Disabled`] if the record is disabled; the cache is not
    /// refilled in that case.
    /// Returns [`AppError::Storage`] if the store lookup fails.
    pub async fn resolve(&self, id: &str) -> Result<String, AppError> {
        let original_url = match self.cache.get(id).await {
            Ok(Some(url)) if !url.is_empty() => {
                debug!(id = %id, "Resolved from cache");
                url
            }
            Ok(_) => self.resolve_from_store(id).await?,
            Err(e) => {
                warn!(id = %id, error = %e, "Cache lookup failed, falling back to store");
                self.resolve_from_store(id).await?
            }
        };

        if let Err(e) = self.stats.record_access(id).await {
            warn!(id = %id, error = %e, "Failed to record access");
        }

        Ok(original_url)
    }

    /// Flips the `enabled` flag of a record and returns the new value.
    ///
    /// Enabling re-creates the cache entry, disabling deletes it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the id is unknown.
    /// Returns [`AppError::Storage`] if the read or the update fails.
    /// Returns [`AppError::Cache`] if the cache mutation fails; the store update
    /// has already been applied at that point and is not rolled back.
    pub async fn toggle_state(&self, id: &str) -> Result<bool, AppError> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(id))?
            .toggled();

        self.repository
            .update_enabled_and_url(&record.id, record.enabled, &record.original_url)
            .await?;

        if record.enabled {
            self.cache
                .set(&record.id, &record.original_url, Some(self.url_ttl))
                .await?;
        } else {
            self.cache.delete(&record.id).await?;
        }

        info!(id = %id, enabled = record.enabled, "Toggled URL state");

        Ok(record.enabled)
    }

    /// Returns the record for `id` straight from the durable store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the id is unknown.
    pub async fn get_record(&self, id: &str) -> Result<UrlRecord, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(id))
    }

    async fn resolve_from_store(&self, id: &str) -> Result<String, AppError> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(id))?;

        if !record.enabled {
            debug!(id = %id, "URL is disabled");
            return Err(AppError::disabled(id));
        }

        self.populate_cache(id, &record.original_url).await;

        Ok(record.original_url)
    }

    /// Best-effort cache write; failures are logged and swallowed.
    async fn populate_cache(&self, id: &str, original_url: &str) {
        if let Err(e) = self.cache.set(id, original_url, Some(self.url_ttl)).await {
            warn!(id = %id, error = %e, "Failed to cache URL");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::cache::{CacheError, MemoryCache, MockCacheService};

    const BASE_URL: &str = "http://localhost:8080";

    fn create_test_record(id: &str, url: &str, enabled: bool) -> UrlRecord {
        UrlRecord {
            id: id.to_string(),
            original_url: url.to_string(),
            short_url: format!("{}/{}", BASE_URL, id),
            enabled,
        }
    }

    fn create_service(
        repository: MockUrlRepository,
        cache: Arc<dyn CacheService>,
    ) -> ResolutionService {
        let stats = Arc::new(StatsService::new(cache.clone()));
        ResolutionService::new(
            Arc::new(repository),
            cache,
            stats,
            BASE_URL,
            DEFAULT_URL_TTL,
        )
    }

    fn failing_cache() -> MockCacheService {
        let mut mock_cache = MockCacheService::new();
        mock_cache
            .expect_get()
            .returning(|_| Err(CacheError::Operation("connection refused".to_string())));
        mock_cache
            .expect_set()
            .returning(|_, _, _| Err(CacheError::Operation("connection refused".to_string())));
        mock_cache
            .expect_delete()
            .returning(|_| Err(CacheError::Operation("connection refused".to_string())));
        mock_cache
            .expect_increment()
            .returning(|_| Err(CacheError::Operation("connection refused".to_string())));
        mock_cache
    }

    #[tokio::test]
    async fn test_shorten_success_populates_cache() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_original_url()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_insert()
            .withf(|record| {
                record.id == "100680"
                    && record.original_url == "https://example.com"
                    && record.short_url == "http://localhost:8080/100680"
                    && record.enabled
            })
            .times(1)
            .returning(|_| Ok(()));

        let cache = Arc::new(MemoryCache::new());
        let service = create_service(mock_repo, cache.clone());

        let short_url = service.shorten("https://example.com").await.unwrap();

        assert_eq!(short_url, "http://localhost:8080/100680");
        assert_eq!(
            cache.get("100680").await.unwrap().as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn test_shorten_existing_url_conflicts_with_original_short_url() {
        let mut mock_repo = MockUrlRepository::new();
        let existing = create_test_record("100680", "https://example.com", true);
        mock_repo
            .expect_find_by_original_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_insert().times(0);

        let service = create_service(mock_repo, Arc::new(MemoryCache::new()));

        let err = service.shorten("https://example.com").await.unwrap_err();

        match err {
            AppError::Conflict { short_url } => {
                assert_eq!(short_url.as_deref(), Some("http://localhost:8080/100680"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_shorten_insert_race_reports_conflict() {
        let mut mock_repo = MockUrlRepository::new();
        let mut seq = mockall::Sequence::new();
        mock_repo
            .expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        mock_repo
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict(None)));
        let winner = create_test_record("100680", "https://example.com", true);
        mock_repo
            .expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(winner.clone())));

        let service = create_service(mock_repo, Arc::new(MemoryCache::new()));

        let err = service.shorten("https://example.com").await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Conflict { short_url: Some(ref url) } if url == "http://localhost:8080/100680"
        ));
    }

    #[tokio::test]
    async fn test_shorten_storage_failure_is_fatal() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::storage("insert timed out after 5s")));

        let mut mock_cache = MockCacheService::new();
        mock_cache.expect_set().times(0);

        let service = create_service(mock_repo, Arc::new(mock_cache));

        let result = service.shorten("https://example.com").await;

        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_shorten_swallows_cache_failure() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_original_url()
            .returning(|_| Ok(None));
        mock_repo.expect_insert().times(1).returning(|_| Ok(()));

        let service = create_service(mock_repo, Arc::new(failing_cache()));

        let result = service.shorten("https://example.com").await;

        assert_eq!(result.unwrap(), "http://localhost:8080/100680");
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_skips_store() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_find_by_id().times(0);

        let cache = Arc::new(MemoryCache::new());
        cache
            .set("100680", "https://example.com", None)
            .await
            .unwrap();
        let service = create_service(mock_repo, cache.clone());

        let url = service.resolve("100680").await.unwrap();

        assert_eq!(url, "https://example.com");
        assert_eq!(
            cache.get("100680:access_count").await.unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_trusts_stale_entry_for_disabled_record() {
        // The store says disabled, but the cached entry wins until it expires.
        let mut mock_repo = MockUrlRepository::new();
        let disabled = create_test_record("100680", "https://example.com", false);
        mock_repo
            .expect_find_by_id()
            .times(0)
            .returning(move |_| Ok(Some(disabled.clone())));

        let cache = Arc::new(MemoryCache::new());
        cache
            .set("100680", "https://example.com", None)
            .await
            .unwrap();
        let service = create_service(mock_repo, cache);

        assert_eq!(
            service.resolve("100680").await.unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn test_resolve_cache_miss_falls_back_and_refills() {
        let mut mock_repo = MockUrlRepository::new();
        let record = create_test_record("100680", "https://example.com", true);
        mock_repo
            .expect_find_by_id()
            .withf(|id| id == "100680")
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let cache = Arc::new(MemoryCache::new());
        let service = create_service(mock_repo, cache.clone());

        let url = service.resolve("100680").await.unwrap();

        assert_eq!(url, "https://example.com");
        assert_eq!(
            cache.get("100680").await.unwrap().as_deref(),
            Some("https://example.com")
        );
        assert_eq!(
            cache.get("100680:access_count").await.unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn test_resolve_empty_cache_value_is_a_miss() {
        let mut mock_repo = MockUrlRepository::new();
        let record = create_test_record("100680", "https://example.com", true);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let cache = Arc::new(MemoryCache::new());
        cache.set("100680", "", None).await.unwrap();
        let service = create_service(mock_repo, cache);

        assert_eq!(
            service.resolve("100680").await.unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_id() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let cache = Arc::new(MemoryCache::new());
        let service = create_service(mock_repo, cache.clone());

        let result = service.resolve("ffffff").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
        assert_eq!(cache.get("ffffff:access_count").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_disabled_does_not_cache() {
        let mut mock_repo = MockUrlRepository::new();
        let record = create_test_record("100680", "https://example.com", false);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let cache = Arc::new(MemoryCache::new());
        let service = create_service(mock_repo, cache.clone());

        let result = service.resolve("100680").await;

        assert!(matches!(result, Err(AppError::Disabled { .. })));
        assert_eq!(cache.get("100680").await.unwrap(), None);
        assert_eq!(cache.get("100680:access_count").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_survives_cache_outage() {
        let mut mock_repo = MockUrlRepository::new();
        let record = create_test_record("100680", "https://example.com", true);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = create_service(mock_repo, Arc::new(failing_cache()));

        assert_eq!(
            service.resolve("100680").await.unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn test_resolve_storage_failure_propagates() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Err(AppError::storage("find_by_id timed out after 5s")));

        let service = create_service(mock_repo, Arc::new(MemoryCache::new()));

        let result = service.resolve("100680").await;

        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_toggle_disable_removes_cache_entry() {
        let mut mock_repo = MockUrlRepository::new();
        let record = create_test_record("100680", "https://example.com", true);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));
        mock_repo
            .expect_update_enabled_and_url()
            .withf(|id, enabled, url| id == "100680" && !*enabled && url == "https://example.com")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let cache = Arc::new(MemoryCache::new());
        cache
            .set("100680", "https://example.com", None)
            .await
            .unwrap();
        let service = create_service(mock_repo, cache.clone());

        let enabled = service.toggle_state("100680").await.unwrap();

        assert!(!enabled);
        assert_eq!(cache.get("100680").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_toggle_enable_recreates_cache_entry() {
        let mut mock_repo = MockUrlRepository::new();
        let record = create_test_record("100680", "https://example.com", false);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));
        mock_repo
            .expect_update_enabled_and_url()
            .withf(|id, enabled, _| id == "100680" && *enabled)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let cache = Arc::new(MemoryCache::new());
        let service = create_service(mock_repo, cache.clone());

        let enabled = service.toggle_state("100680").await.unwrap();

        assert!(enabled);
        assert_eq!(
            cache.get("100680").await.unwrap().as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn test_toggle_unknown_id() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        mock_repo.expect_update_enabled_and_url().times(0);

        let service = create_service(mock_repo, Arc::new(MemoryCache::new()));

        let result = service.toggle_state("ffffff").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_toggle_storage_failure_skips_cache() {
        let mut mock_repo = MockUrlRepository::new();
        let record = create_test_record("100680", "https://example.com", true);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));
        mock_repo
            .expect_update_enabled_and_url()
            .times(1)
            .returning(|_, _, _| Err(AppError::storage("update timed out after 5s")));

        let mut mock_cache = MockCacheService::new();
        mock_cache.expect_delete().times(0);
        mock_cache.expect_set().times(0);

        let service = create_service(mock_repo, Arc::new(mock_cache));

        let result = service.toggle_state("100680").await;

        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_toggle_propagates_cache_failure() {
        let mut mock_repo = MockUrlRepository::new();
        let record = create_test_record("100680", "https://example.com", true);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));
        mock_repo
            .expect_update_enabled_and_url()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = create_service(mock_repo, Arc::new(failing_cache()));

        let result = service.toggle_state("100680").await;

        assert!(matches!(result, Err(AppError::Cache(_))));
    }

    #[tokio::test]
    async fn test_get_record() {
        let mut mock_repo = MockUrlRepository::new();
        let record = create_test_record("100680", "https://example.com", true);
        let expected = record.clone();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = create_service(mock_repo, Arc::new(MemoryCache::new()));

        assert_eq!(service.get_record("100680").await.unwrap(), expected);
    }
}
