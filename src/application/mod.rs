//! Application layer services implementing business logic.
//!
//! Services consume the repository and cache traits and provide a clean API
//! for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::resolution_service::ResolutionService`] - Shortening, resolution and toggling
//! - [`services::stats_service::StatsService`] - Access counters

pub mod services;
