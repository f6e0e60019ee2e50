//! Caching subsystem.
//!
//! - [`CacheBackend`]: the raw key → string store with per-entry TTL.
//!   Implementations: [`MemoryBackend`] (moka, in-process) and
//!   `RedisBackend` (feature `redis`, networked).
//!
//! - [`CacheStore`]: fail-open facade over a backend. Backend failures are
//!   logged and counted, then reported to the caller as a miss (`get`) or a
//!   no-op (`set`, `delete`). Cache unavailability therefore degrades to
//!   "always fetch upstream" and never fails a request.
//!
//! - [`keys`]: deterministic key derivation and the TTL policy per entity
//!   kind.

pub mod keys;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use keys::{CachePolicy, EntityKind, KeyBuilder};
pub use memory::{CacheConfig, MemoryBackend};
#[cfg(feature = "redis")]
pub use redis::RedisBackend;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::telemetry;

/// Failure inside a cache backend. Never crosses the [`CacheStore`]
/// boundary.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache payload error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "redis")]
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
}

/// Result type for backend operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// A key → string-payload store with an expiry attached at write time.
///
/// Expiry is the backend's job; there is no sweep on our side. Writes
/// replace the whole entry.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Backend name for logs and metrics (e.g. `"memory"`, `"redis"`).
    fn name(&self) -> &str;

    /// Fetch a live entry. `Ok(None)` on miss or expiry.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Insert or replace an entry that expires after `ttl`.
    async fn set(&self, key: &str, payload: String, ttl: Duration) -> CacheResult<()>;

    /// Remove an entry. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;
}

/// Fail-open cache facade.
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
}

impl CacheStore {
    /// Wrap a backend.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// In-process store with the given configuration.
    pub fn memory(config: &CacheConfig) -> Self {
        Self::new(Arc::new(MemoryBackend::new(config)))
    }

    /// Name of the underlying backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Read a raw payload. Backend failures are reported as a miss.
    pub async fn get(&self, key: &str) -> Option<String> {
        let start = Instant::now();
        let result = self.backend.get(key).await;
        self.record_duration("get", start);

        match result {
            Ok(Some(payload)) => {
                debug!(key, outcome = "hit", elapsed_ms = elapsed_ms(start), "cache get");
                self.count(telemetry::CACHE_HITS_TOTAL);
                Some(payload)
            }
            Ok(None) => {
                debug!(key, outcome = "miss", elapsed_ms = elapsed_ms(start), "cache get");
                self.count(telemetry::CACHE_MISSES_TOTAL);
                None
            }
            Err(e) => {
                warn!(key, outcome = "error", elapsed_ms = elapsed_ms(start), error = %e, "cache get failed, treating as miss");
                self.count_error("get");
                self.count(telemetry::CACHE_MISSES_TOTAL);
                None
            }
        }
    }

    /// Write a raw payload. Backend failures are logged and ignored.
    pub async fn set(&self, key: &str, payload: String, ttl: Duration) {
        let start = Instant::now();
        let result = self.backend.set(key, payload, ttl).await;
        self.record_duration("set", start);

        match result {
            Ok(()) => {
                debug!(key, outcome = "stored", ttl_secs = ttl.as_secs(), elapsed_ms = elapsed_ms(start), "cache set");
            }
            Err(e) => {
                warn!(key, outcome = "error", elapsed_ms = elapsed_ms(start), error = %e, "cache set failed, ignoring");
                self.count_error("set");
            }
        }
    }

    /// Remove an entry. Backend failures are logged and ignored.
    pub async fn delete(&self, key: &str) {
        let start = Instant::now();
        let result = self.backend.delete(key).await;
        self.record_duration("delete", start);

        match result {
            Ok(()) => {
                debug!(key, outcome = "deleted", elapsed_ms = elapsed_ms(start), "cache delete");
            }
            Err(e) => {
                warn!(key, outcome = "error", elapsed_ms = elapsed_ms(start), error = %e, "cache delete failed, ignoring");
                self.count_error("delete");
            }
        }
    }

    /// Read and deserialize a JSON payload.
    ///
    /// A payload that no longer matches `T` (e.g. written by an older
    /// version) counts as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let payload = self.get(key).await?;
        match serde_json::from_str(&payload) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "cached payload has unexpected shape, treating as miss");
                self.count_error("decode");
                None
            }
        }
    }

    /// Serialize a value as JSON and write it.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_string(value) {
            Ok(payload) => self.set(key, payload, ttl).await,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache payload, skipping write");
                self.count_error("encode");
            }
        }
    }

    fn count(&self, metric: &'static str) {
        metrics::counter!(metric, "backend" => self.backend.name().to_owned()).increment(1);
    }

    fn count_error(&self, operation: &'static str) {
        metrics::counter!(telemetry::CACHE_ERRORS_TOTAL,
            "backend" => self.backend.name().to_owned(),
            "operation" => operation,
        )
        .increment(1);
    }

    fn record_duration(&self, operation: &'static str, start: Instant) {
        metrics::histogram!(telemetry::CACHE_OPERATION_DURATION_SECONDS,
            "backend" => self.backend.name().to_owned(),
            "operation" => operation,
        )
        .record(start.elapsed().as_secs_f64());
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
