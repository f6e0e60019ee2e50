//! Builder for configuring read-through catalog instances

use std::sync::Arc;
use std::time::Duration;

use super::ReadThroughCatalog;
use crate::cache::{CacheBackend, CacheConfig, CachePolicy, CacheStore, KeyBuilder, MemoryBackend};
use crate::catalog::{CatalogProvider, GoogleBooksClient};
use crate::{MimirError, Result};

/// Main entry point for creating catalog instances.
pub struct Mimir;

impl Mimir {
    /// Create a new builder for configuring the catalog.
    pub fn builder() -> MimirBuilder {
        MimirBuilder::new()
    }
}

/// Builder for configuring catalog instances.
///
/// ```rust,no_run
/// # use mimir::{Mimir, CacheConfig};
/// # fn main() -> mimir::Result<()> {
/// let catalog = Mimir::builder()
///     .google_books("your-api-key")
///     .memory_cache(CacheConfig::new().max_entries(50_000))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct MimirBuilder {
    google_books_key: Option<String>,
    base_url: Option<String>,
    http_client: Option<reqwest::Client>,
    provider: Option<Arc<dyn CatalogProvider>>,
    backend: Option<Arc<dyn CacheBackend>>,
    memory_config: CacheConfig,
    #[cfg(feature = "redis")]
    redis_url: Option<String>,
    key_prefix: Option<String>,
    search_ttl: Option<Duration>,
}

impl MimirBuilder {
    pub fn new() -> Self {
        Self {
            google_books_key: None,
            base_url: None,
            http_client: None,
            provider: None,
            backend: None,
            memory_config: CacheConfig::default(),
            #[cfg(feature = "redis")]
            redis_url: None,
            key_prefix: None,
            search_ttl: None,
        }
    }

    /// Configure the Google Books provider.
    pub fn google_books(mut self, api_key: impl Into<String>) -> Self {
        self.google_books_key = Some(api_key.into());
        self
    }

    /// Override the Google Books base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Share an HTTP client (connection pool) with the Google Books provider.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Use a custom provider. Takes precedence over [`google_books`](Self::google_books).
    pub fn provider(mut self, provider: Arc<dyn CatalogProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Use a custom cache backend. Takes precedence over any other cache
    /// setting.
    pub fn cache_backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Configure the in-process cache (the default backend).
    pub fn memory_cache(mut self, config: CacheConfig) -> Self {
        self.memory_config = config;
        self
    }

    /// Use Redis at `url` instead of the in-process cache.
    #[cfg(feature = "redis")]
    pub fn redis(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    /// Set the cache key prefix (default: `books:v1`).
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Set the search-result TTL. Single books are cached four times as
    /// long.
    pub fn search_ttl(mut self, ttl: Duration) -> Self {
        self.search_ttl = Some(ttl);
        self
    }

    /// Build the catalog.
    pub fn build(self) -> Result<ReadThroughCatalog> {
        let provider: Arc<dyn CatalogProvider> = match (self.provider, self.google_books_key) {
            (Some(provider), _) => provider,
            (None, Some(key)) => {
                let mut client = match &self.base_url {
                    Some(url) => GoogleBooksClient::with_base_url(key, url)?,
                    None => GoogleBooksClient::new(key)?,
                };
                if let Some(http) = self.http_client {
                    client = client.with_http_client(http);
                }
                Arc::new(client)
            }
            (None, None) => return Err(MimirError::NoProvider),
        };

        #[cfg_attr(not(feature = "redis"), allow(unused_mut))]
        let mut backend = self.backend;

        #[cfg(feature = "redis")]
        if backend.is_none()
            && let Some(url) = self.redis_url.as_deref()
        {
            let redis = crate::cache::RedisBackend::new(url)
                .map_err(|e| MimirError::Configuration(format!("invalid redis URL: {e}")))?;
            backend = Some(Arc::new(redis));
        }

        let backend = backend
            .unwrap_or_else(|| Arc::new(MemoryBackend::new(&self.memory_config)));

        let keys = match self.key_prefix {
            Some(prefix) => KeyBuilder::with_prefix(prefix),
            None => KeyBuilder::default(),
        };
        let policy = match self.search_ttl {
            Some(ttl) => CachePolicy::from_search_ttl(ttl),
            None => CachePolicy::default(),
        };

        Ok(ReadThroughCatalog::new(provider, CacheStore::new(backend))
            .with_keys(keys)
            .with_policy(policy))
    }
}

impl Default for MimirBuilder {
    fn default() -> Self {
        Self::new()
    }
}
