//! Cache-through orchestration for the full-data endpoint.
//!
//! Three artifacts are cached per location: the realtime reading, the filtered
//! forecast and the generated report. The realtime reading is resolved on its
//! own. The forecast and the report are only reused when both are cached, and
//! are always refreshed together.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    cache::CacheStore,
    error::CacheError,
    filter::{AllowList, filter_forecast},
    insight::ReportGenerator,
    model::{
        ArtifactKind, FORECAST_FETCH_FAILED, FullWeatherReport, INSIGHT_INVALID_FORECAST,
        LocationKey, REALTIME_FETCH_FAILED, error_placeholder, insight_failure,
    },
    provider::WeatherProvider,
};

#[derive(Debug, Clone)]
pub struct WeatherService {
    cache: Arc<dyn CacheStore>,
    provider: Arc<dyn WeatherProvider>,
    generator: Arc<dyn ReportGenerator>,
    allow: AllowList,
}

impl WeatherService {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        provider: Arc<dyn WeatherProvider>,
        generator: Arc<dyn ReportGenerator>,
    ) -> Self {
        Self {
            cache,
            provider,
            generator,
            allow: AllowList::standard(),
        }
    }

    /// Resolve realtime conditions, filtered forecast and report for one
    /// location.
    ///
    /// Upstream and report failures are embedded in the result as
    /// placeholders. Only cache faults are returned as errors.
    #[instrument(skip(self))]
    pub async fn full_data(&self, location_name: &str) -> Result<FullWeatherReport, CacheError> {
        let location = LocationKey::new(location_name);

        let key_rt = location.cache_key(ArtifactKind::Realtime);
        let key_fc = location.cache_key(ArtifactKind::Forecast);
        let key_in = location.cache_key(ArtifactKind::Insight);

        let cached_rt = self
            .cache
            .get(&key_rt)
            .await?
            .and_then(|raw| decode_cached(&key_rt, &raw));
        let cached_fc = self
            .cache
            .get(&key_fc)
            .await?
            .and_then(|raw| decode_cached(&key_fc, &raw));
        let cached_in = self
            .cache
            .get(&key_in)
            .await?
            .filter(|s| !s.is_empty());

        let realtime = match cached_rt {
            Some(realtime) => {
                debug!(%location, "realtime cache hit");
                realtime
            }
            None => self.refresh_realtime(&location, &key_rt).await?,
        };

        let (forecast, insight) = match (cached_fc, cached_in) {
            (Some(forecast), Some(insight)) => {
                debug!(%location, "forecast and insight cache hit");
                (forecast, insight)
            }
            _ => self.refresh_forecast(&location, &key_fc, &key_in).await?,
        };

        Ok(FullWeatherReport::new(realtime, forecast, insight))
    }

    async fn refresh_realtime(
        &self,
        location: &LocationKey,
        key: &str,
    ) -> Result<Value, CacheError> {
        match self.provider.realtime(location.as_str()).await {
            Ok(realtime) => {
                let ttl = ArtifactKind::Realtime.ttl();
                self.cache.set_ex(key, &realtime.to_string(), ttl).await?;
                info!(%location, "realtime refreshed");
                Ok(realtime)
            }
            Err(err) => {
                warn!(%location, error = %err, "realtime fetch failed");
                Ok(error_placeholder(REALTIME_FETCH_FAILED))
            }
        }
    }

    async fn refresh_forecast(
        &self,
        location: &LocationKey,
        key_fc: &str,
        key_in: &str,
    ) -> Result<(Value, String), CacheError> {
        let raw = match self.provider.forecast(location.as_str()).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%location, error = %err, "forecast fetch failed");
                return Ok((
                    error_placeholder(FORECAST_FETCH_FAILED),
                    INSIGHT_INVALID_FORECAST.to_string(),
                ));
            }
        };

        let forecast = filter_forecast(&raw, &self.allow);
        let ttl = ArtifactKind::Forecast.ttl();
        self.cache.set_ex(key_fc, &forecast.to_string(), ttl).await?;
        info!(%location, "forecast refreshed");

        let insight = match self.generator.generate(&forecast).await {
            Ok(insight) => {
                self.cache.set_ex(key_in, &insight, ArtifactKind::Insight.ttl()).await?;
                insight
            }
            Err(err) => {
                warn!(%location, error = %err, "report generation failed");
                insight_failure(&err)
            }
        };

        Ok((forecast, insight))
    }
}

/// Cached JSON, or `None` when the entry is unreadable or `null`.
fn decode_cached(key: &str, raw: &str) -> Option<Value> {
    match serde_json::from_str(raw) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "discarding unreadable cache entry");
            None
        }
    }
}
