//! Redis cache backend.
//!
//! Entries are plain string values written with `SET key value EX ttl`;
//! Redis enforces expiry. The connection is opened lazily on first use
//! through a [`ConnectionManager`], which also reconnects after failures.
//! An unreachable server therefore surfaces as per-operation errors (which
//! [`CacheStore`](super::CacheStore) turns into misses) rather than as a
//! construction failure.

use std::time::Duration;

use ::redis::AsyncCommands;
use ::redis::aio::ConnectionManager;
use async_trait::async_trait;
use tokio::sync::OnceCell;

use super::{CacheBackend, CacheError, CacheResult};

/// Networked [`CacheBackend`] over Redis.
pub struct RedisBackend {
    client: ::redis::Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisBackend {
    /// Create a backend for a `redis://` or `rediss://` URL.
    ///
    /// Only the URL is validated here; no connection is attempted.
    pub fn new(url: &str) -> CacheResult<Self> {
        let client = ::redis::Client::open(url)?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> CacheResult<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                ConnectionManager::new(self.client.clone())
                    .await
                    .map_err(CacheError::from)
            })
            .await?;
        Ok(manager.clone())
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &str {
        "redis"
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, payload: String, ttl: Duration) -> CacheResult<()> {
        // EX 0 is rejected by Redis
        let seconds = ttl.as_secs().max(1);
        let mut conn = self.connection().await?;
        let _: () = conn.set_ex(key, payload, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}
