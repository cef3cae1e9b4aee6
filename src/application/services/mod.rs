//! Business logic services for the application layer.

pub mod resolution_service;
pub mod stats_service;

pub use resolution_service::{DEFAULT_URL_TTL, ResolutionService};
pub use stats_service::StatsService;
