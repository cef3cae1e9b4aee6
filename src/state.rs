//! Shared application state injected into all handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{ResolutionService, StatsService};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::CacheService;

#[derive(Clone)]
pub struct AppState {
    pub resolution_service: Arc<ResolutionService>,
    pub stats_service: Arc<StatsService>,
    pub repository: Arc<dyn UrlRepository>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    /// Wires the services around one store and one cache.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        base_url: impl Into<String>,
        url_ttl: Duration,
    ) -> Self {
        let stats_service = Arc::new(StatsService::new(cache.clone()));
        let resolution_service = Arc::new(ResolutionService::new(
            repository.clone(),
            cache.clone(),
            stats_service.clone(),
            base_url,
            url_ttl,
        ));

        Self {
            resolution_service,
            stats_service,
            repository,
            cache,
        }
    }
}
