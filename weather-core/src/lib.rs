//! Core library for the `weatherx` backend.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The Tomorrow.io provider client and the forecast field filter
//! - Cache stores (Upstash REST, in-process)
//! - Report generation against a chat-completion backend
//! - The cache-through orchestrator behind `/weather/full_data`
//!
//! It is used by `weatherx-server`, but every collaborator sits behind a trait
//! so other binaries or tests can substitute their own.

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod insight;
pub mod model;
pub mod provider;
pub mod service;

pub use cache::{CacheStore, MemoryCache, UpstashCache};
pub use config::Config;
pub use error::{CacheError, FetchError, InsightError};
pub use filter::{AllowList, filter_forecast};
pub use insight::{ChatReportGenerator, ReportGenerator};
pub use model::{ArtifactKind, FullWeatherReport, LocationKey};
pub use provider::WeatherProvider;
pub use service::WeatherService;

/// Build the service with the collaborators selected by `config`.
pub fn service_from_config(config: &Config) -> anyhow::Result<WeatherService> {
    let cache = cache::cache_from_config(&config.cache)?;
    let provider = provider::provider_from_config(config)?;
    let generator = insight::generator_from_config(config)?;

    Ok(WeatherService::new(cache, provider, generator))
}
