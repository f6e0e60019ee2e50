//! In-process cache backend.
//!
//! [`MemoryBackend`] stores serialized payloads in a moka LRU cache. Unlike
//! a cache-wide `time_to_live`, every entry carries the TTL it was written
//! with, so single-book and search entries can share one store while
//! expiring on their own schedules.
//!
//! Suitable for a single instance. For several instances sharing one cache,
//! use `RedisBackend` (feature `redis`) instead; both satisfy the same
//! [`CacheBackend`] contract.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use super::{CacheBackend, CacheResult};

/// Configuration for the in-process cache.
///
/// ```rust
/// # use mimir::CacheConfig;
/// let config = CacheConfig::new().max_entries(50_000);
/// assert_eq!(config.max_entries, 50_000);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }
}

#[derive(Clone)]
struct StoredPayload {
    payload: Arc<str>,
    ttl: Duration,
}

/// Expiry policy reading the TTL stored alongside each value.
struct PerEntryTtl;

impl Expiry<String, StoredPayload> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredPayload,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredPayload,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Moka-backed in-process [`CacheBackend`].
pub struct MemoryBackend {
    cache: Cache<String, StoredPayload>,
}

impl MemoryBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self
            .cache
            .get(key)
            .await
            .map(|stored| stored.payload.to_string()))
    }

    async fn set(&self, key: &str, payload: String, ttl: Duration) -> CacheResult<()> {
        let stored = StoredPayload {
            payload: payload.into(),
            ttl,
        };
        self.cache.insert(key.to_string(), stored).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}
