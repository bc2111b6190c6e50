pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod server;

// Layered boundaries: use cases and ports in app, adapters in infra
pub mod app;
pub mod infra;

use crate::app::DashboardUseCase;
use crate::config::Config;
use crate::pipeline::{DatasetCache, Normalizer};

/// Wire source, normalizer and cache from configuration.
pub fn build_dashboard(config: &Config) -> DashboardUseCase {
    DashboardUseCase::new(
        infra::build_source(&config.source),
        Normalizer::new(config.normalize_options()),
        DatasetCache::new(config.cache_ttl()),
    )
}
