use crate::{Config, error::FetchError, provider::tomorrow::TomorrowIoProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::{fmt::Debug, sync::Arc};

pub mod tomorrow;

/// Read-only access to an upstream weather API.
///
/// Payloads are returned as raw JSON so they can be cached and forwarded
/// without reshaping.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn realtime(&self, location: &str) -> Result<Value, FetchError>;

    async fn forecast(&self, location: &str) -> Result<Value, FetchError>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.weather_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No Tomorrow.io API key configured.\n\
             Hint: set TOMORROW_API_KEY or run `weatherx configure`."
        )
    })?;

    Ok(Arc::new(TomorrowIoProvider::new(
        config.weather.base_url.clone(),
        api_key.to_owned(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No Tomorrow.io API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.weather.api_key = Some("KEY".into());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
