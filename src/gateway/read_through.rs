//! ReadThroughCatalog - cache-aside orchestration over a catalog provider

use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{debug, info, instrument, warn};

use crate::cache::{CachePolicy, CacheStore, EntityKind, KeyBuilder};
use crate::catalog::CatalogProvider;
use crate::types::{CatalogRecord, MAX_RESULTS_LIMIT, SearchQuery};
use crate::{MimirError, Result};

/// Read-through cache in front of a [`CatalogProvider`].
///
/// Each request does at most one cache read, one upstream call and one cache
/// write, in that order. A hit is returned as stored: there is no freshness
/// check beyond the TTL. Upstream failures propagate and are never cached.
/// Concurrent misses for the same key may both reach upstream; the last
/// write wins.
#[derive(Clone)]
pub struct ReadThroughCatalog {
    provider: Arc<dyn CatalogProvider>,
    cache: CacheStore,
    keys: KeyBuilder,
    policy: CachePolicy,
}

impl ReadThroughCatalog {
    /// Orchestrator with the default key prefix and TTL policy.
    pub fn new(provider: Arc<dyn CatalogProvider>, cache: CacheStore) -> Self {
        Self {
            provider,
            cache,
            keys: KeyBuilder::default(),
            policy: CachePolicy::default(),
        }
    }

    /// Replace the key builder.
    pub fn with_keys(mut self, keys: KeyBuilder) -> Self {
        self.keys = keys;
        self
    }

    /// Replace the TTL policy.
    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn keys(&self) -> &KeyBuilder {
        &self.keys
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Search the catalog through the cache.
    ///
    /// Results are cached per (terms, language). A miss always fetches the
    /// full page of [`MAX_RESULTS_LIMIT`] so the entry serves every cap; the
    /// returned list is truncated to the query's cap. An empty list is a
    /// valid cached result.
    #[instrument(name = "read_through.search", skip(self, query), fields(provider = self.provider.name(), language = %query.language))]
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogRecord>> {
        let key = self.keys.search(query);
        let limit = query.result_limit() as usize;

        if let Some(mut records) = self.cache.get_json::<Vec<CatalogRecord>>(&key).await {
            debug!(key = %key, count = records.len(), "serving search from cache");
            records.truncate(limit);
            return Ok(records);
        }

        let full = query.clone().max_results(MAX_RESULTS_LIMIT);
        let mut records = self.provider.search(&full).await?;
        info!(key = %key, count = records.len(), "fetched search results");

        self.cache
            .set_json(&key, &records, self.policy.ttl(EntityKind::Search))
            .await;
        records.truncate(limit);
        Ok(records)
    }

    /// Fetch one book through the cache.
    ///
    /// A blank `id` is rejected before touching the cache or upstream.
    #[instrument(name = "read_through.get_by_id", skip(self), fields(provider = self.provider.name()))]
    pub async fn get_by_id(&self, id: &str) -> Result<CatalogRecord> {
        let id = id.trim();
        if id.is_empty() {
            return Err(MimirError::InvalidInput("book id is required".to_string()));
        }

        let key = self.keys.book(id);
        if let Some(record) = self.cache.get_json::<CatalogRecord>(&key).await {
            debug!(key = %key, "serving book from cache");
            return Ok(record);
        }

        let record = match self.provider.get_volume(id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(id, error = %e, "book lookup failed");
                return Err(e);
            }
        };

        self.cache
            .set_json(&key, &record, self.policy.ttl(EntityKind::Book))
            .await;
        Ok(record)
    }

    /// Bestsellers for the current year.
    pub async fn bestsellers(&self, language: &str) -> Result<Vec<CatalogRecord>> {
        self.bestsellers_for_year(Utc::now().year(), language).await
    }

    /// Bestsellers for `year`, served by the ordinary search path.
    pub async fn bestsellers_for_year(
        &self,
        year: i32,
        language: &str,
    ) -> Result<Vec<CatalogRecord>> {
        let query = SearchQuery::bestsellers(year).language(language);
        self.search(&query).await
    }

    /// Drop the cached entry for one book.
    pub async fn invalidate_book(&self, id: &str) -> Result<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(MimirError::InvalidInput("book id is required".to_string()));
        }
        self.cache.delete(&self.keys.book(id)).await;
        Ok(())
    }

    /// Drop the cached result list for a search.
    pub async fn invalidate_search(&self, query: &SearchQuery) {
        self.cache.delete(&self.keys.search(query)).await;
    }
}
