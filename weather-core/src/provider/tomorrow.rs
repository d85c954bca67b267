use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{FetchError, truncate_body};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.tomorrow.io/v4";

/// Tomorrow.io v4 client. No retries; any non-200 reply is a failure.
#[derive(Debug, Clone)]
pub struct TomorrowIoProvider {
    base_url: String,
    api_key: String,
    http: Client,
}

impl TomorrowIoProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http: Client::new(),
        }
    }

    async fn fetch(&self, endpoint: &str, location: &str) -> Result<Value, FetchError> {
        let url = format!("{}/weather/{}", self.base_url, endpoint);

        let res = self
            .http
            .get(&url)
            .query(&[("location", location), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status != reqwest::StatusCode::OK {
            tracing::warn!(endpoint, %status, "Tomorrow.io request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for TomorrowIoProvider {
    async fn realtime(&self, location: &str) -> Result<Value, FetchError> {
        self.fetch("realtime", location).await
    }

    async fn forecast(&self, location: &str) -> Result<Value, FetchError> {
        self.fetch("forecast", location).await
    }
}
