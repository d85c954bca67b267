use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::{fmt, time::Duration};

pub const STATUS_SUCCESS: &str = "success";

pub const REALTIME_FETCH_FAILED: &str = "Failed to fetch realtime weather";
pub const FORECAST_FETCH_FAILED: &str = "Failed to fetch forecast weather";
pub const INSIGHT_INVALID_FORECAST: &str = "AI unavailable due to invalid forecast data.";

/// Normalized location name used as the cache namespace.
///
/// Two inputs that differ only in case or surrounding whitespace produce the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey(String);

impl LocationKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn cache_key(&self, kind: ArtifactKind) -> String {
        format!("{}{}", kind.key_prefix(), self.0)
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three independently cached artifacts of a full-data query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Realtime,
    Forecast,
    Insight,
}

impl ArtifactKind {
    pub fn key_prefix(&self) -> &'static str {
        match self {
            ArtifactKind::Realtime => "weather:realtime:",
            ArtifactKind::Forecast => "weather:forecast:",
            ArtifactKind::Insight => "weather:insight:",
        }
    }

    pub fn ttl(&self) -> Duration {
        match self {
            ArtifactKind::Realtime => Duration::from_secs(600),
            ArtifactKind::Forecast | ArtifactKind::Insight => Duration::from_secs(1800),
        }
    }
}

/// Body of `GET /weather/full_data`.
///
/// Upstream failures are embedded as field values; `status` is always
/// `"success"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullWeatherReport {
    pub status: String,
    pub realtime: Value,
    pub forecast: Value,
    pub insight: String,
}

impl FullWeatherReport {
    pub fn new(realtime: Value, forecast: Value, insight: String) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            realtime,
            forecast,
            insight,
        }
    }
}

pub fn error_placeholder(message: &str) -> Value {
    json!({ "error": message })
}

pub fn insight_failure(cause: &dyn fmt::Display) -> String {
    format!("AI unavailable. Error: {cause}")
}
