use crate::{config::CacheConfig, error::CacheError};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod memory;
pub mod upstash;

pub use memory::MemoryCache;
pub use upstash::UpstashCache;

/// Key-value store with per-key expiration.
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Construct the cache from config: Upstash when configured, otherwise an
/// in-process store.
pub fn cache_from_config(config: &CacheConfig) -> anyhow::Result<Arc<dyn CacheStore>> {
    match (config.url.as_deref(), config.token.as_deref()) {
        (Some(url), Some(token)) => {
            tracing::info!(url, "using Upstash cache");
            Ok(Arc::new(UpstashCache::new(url.to_owned(), token.to_owned())))
        }
        (None, None) => {
            tracing::warn!("no cache service configured, falling back to in-process cache");
            Ok(Arc::new(MemoryCache::new()))
        }
        _ => Err(anyhow::anyhow!(
            "Cache URL and token must be configured together.\n\
             Hint: set both UPSTASH_REDIS_URL and UPSTASH_REDIS_TOKEN, or neither."
        )),
    }
}
