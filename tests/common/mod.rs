#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use url_toggle::domain::entities::UrlRecord;
use url_toggle::domain::repositories::UrlRepository;
use url_toggle::error::AppError;
use url_toggle::infrastructure::cache::{CacheError, CacheResult, CacheService, MemoryCache};
use url_toggle::routes::router;
use url_toggle::state::AppState;

use axum_test::TestServer;

pub const BASE_URL: &str = "http://localhost:8080";
pub const URL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Durable store double keyed by id, with a switch to simulate an outage.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    records: Mutex<HashMap<String, UrlRecord>>,
    unavailable: AtomicBool,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn put(&self, record: UrlRecord) {
        self.records.lock().await.insert(record.id.clone(), record);
    }

    pub async fn get(&self, id: &str) -> Option<UrlRecord> {
        self.records.lock().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::storage("store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn insert(&self, record: &UrlRecord) -> Result<(), AppError> {
        self.check()?;
        let mut records = self.records.lock().await;
        if records
            .values()
            .any(|r| r.original_url == record.original_url)
            || records.contains_key(&record.id)
        {
            return Err(AppError::conflict(None));
        }
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UrlRecord>, AppError> {
        self.check()?;
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, AppError> {
        self.check()?;
        Ok(self
            .records
            .lock()
            .await
            .values()
            .find(|r| r.original_url == original_url)
            .cloned())
    }

    async fn update_enabled_and_url(
        &self,
        id: &str,
        enabled: bool,
        original_url: &str,
    ) -> Result<(), AppError> {
        self.check()?;
        let mut records = self.records.lock().await;
        let record = records.get_mut(id).ok_or_else(|| AppError::not_found(id))?;
        record.enabled = enabled;
        record.original_url = original_url.to_string();
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.check()?;
        Ok(self.records.lock().await.len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }
}

/// Fast cache double that fails every operation.
pub struct UnavailableCache;

#[async_trait]
impl CacheService for UnavailableCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> CacheResult<()> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn increment(&self, _key: &str) -> CacheResult<i64> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

pub struct TestContext {
    pub server: TestServer,
    pub repository: Arc<InMemoryUrlRepository>,
    pub cache: Arc<MemoryCache>,
}

/// Builds the full router over an in-memory store and cache.
pub fn create_test_context() -> TestContext {
    let repository = Arc::new(InMemoryUrlRepository::new());
    let cache = Arc::new(MemoryCache::new());

    let state = AppState::new(repository.clone(), cache.clone(), BASE_URL, URL_TTL);
    let server = TestServer::new(router(state)).unwrap();

    TestContext {
        server,
        repository,
        cache,
    }
}

/// Builds the full router over an in-memory store and a cache that is down.
pub fn create_server_without_cache() -> (TestServer, Arc<InMemoryUrlRepository>) {
    let repository = Arc::new(InMemoryUrlRepository::new());

    let state = AppState::new(repository.clone(), Arc::new(UnavailableCache), BASE_URL, URL_TTL);
    let server = TestServer::new(router(state)).unwrap();

    (server, repository)
}

pub fn record(id: &str, original_url: &str, enabled: bool) -> UrlRecord {
    let mut record = UrlRecord::new(
        id.to_string(),
        original_url.to_string(),
        format!("{}/{}", BASE_URL, id),
    );
    record.enabled = enabled;
    record
}
