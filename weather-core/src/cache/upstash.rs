use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::{CacheError, truncate_body};

use super::CacheStore;

/// Client for the Upstash Redis REST API.
///
/// Each command is POSTed as a JSON array to the database URL; replies are
/// `{"result": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone)]
pub struct UpstashCache {
    url: String,
    token: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct UpstashReply {
    #[serde(default)]
    result: Value,
    error: Option<String>,
}

impl UpstashCache {
    pub fn new(url: String, token: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            token,
            http: Client::new(),
        }
    }

    async fn command(&self, args: &[&str]) -> Result<Value, CacheError> {
        let res = self.http.post(&self.url).bearer_auth(&self.token).json(args).send().await?;

        let status = res.status();
        let body = res.text().await?;

        let reply: Option<UpstashReply> = serde_json::from_str(&body).ok();

        if let Some(err) = reply.as_ref().and_then(|r| r.error.clone()) {
            return Err(CacheError::Command(err));
        }
        if !status.is_success() {
            return Err(CacheError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        reply
            .map(|r| r.result)
            .ok_or_else(|| CacheError::Reply(truncate_body(&body)))
    }
}

#[async_trait]
impl CacheStore for UpstashCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self.command(&["GET", key]).await? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(CacheError::Reply(format!("GET {key} returned {other}"))),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let secs = ttl.as_secs().to_string();
        match self.command(&["SETEX", key, &secs, value]).await? {
            Value::String(s) if s == "OK" => Ok(()),
            other => Err(CacheError::Reply(format!("SETEX {key} returned {other}"))),
        }
    }
}
