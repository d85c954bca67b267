use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::error::CacheError;

use super::CacheStore;

pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// In-process cache with a per-entry TTL and bounded capacity.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, (String, Duration)>,
}

/// Expires each entry after the TTL stored alongside its value. Overwriting a
/// key restarts its TTL.
struct PerEntryTtl;

impl Expiry<String, (String, Duration)> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &(String, Duration),
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.1)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &(String, Duration),
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.1)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();

        Self { entries }
    }

    #[cfg(test)]
    pub(crate) async fn remove(&self, key: &str) {
        self.entries.invalidate(key).await;
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).await.map(|(value, _)| value))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .insert(key.to_owned(), (value.to_owned(), ttl))
            .await;
        Ok(())
    }
}
