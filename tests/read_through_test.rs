//! Tests for [`ReadThroughCatalog`]: cache-aside orchestration.
//!
//! A counting mock provider stands in for the upstream and a recording
//! backend captures every write with its TTL.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde_json::json;

use mimir::cache::{CacheBackend, CacheError, CacheResult, MemoryBackend};
use mimir::types::validate_volume;
use mimir::{
    CacheStore, CatalogProvider, CatalogRecord, Mimir, MimirError, ReadThroughCatalog, Result,
    SearchQuery,
};

// ============================================================================
// Mock provider
// ============================================================================

fn record(id: &str, language: &str) -> CatalogRecord {
    validate_volume(json!({
        "id": id,
        "volumeInfo": { "title": format!("Title {id}"), "language": language }
    }))
    .unwrap()
}

enum Behaviour {
    Books(Vec<CatalogRecord>),
    Fail(fn() -> MimirError),
}

/// Provider that counts calls and records the last search terms.
struct CountingProvider {
    behaviour: Behaviour,
    search_calls: AtomicUsize,
    volume_calls: AtomicUsize,
    last_terms: Mutex<Option<String>>,
}

impl CountingProvider {
    fn with_books(books: Vec<CatalogRecord>) -> Arc<Self> {
        Arc::new(Self::new(Behaviour::Books(books)))
    }

    fn failing(err: fn() -> MimirError) -> Arc<Self> {
        Arc::new(Self::new(Behaviour::Fail(err)))
    }

    fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            search_calls: AtomicUsize::new(0),
            volume_calls: AtomicUsize::new(0),
            last_terms: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst) + self.volume_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogRecord>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_terms.lock().unwrap() = Some(query.upstream_terms());
        match &self.behaviour {
            Behaviour::Books(books) => Ok(books
                .iter()
                .filter(|b| b.is_language(&query.language))
                .take(query.result_limit() as usize)
                .cloned()
                .collect()),
            Behaviour::Fail(err) => Err(err()),
        }
    }

    async fn get_volume(&self, id: &str) -> Result<CatalogRecord> {
        self.volume_calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            Behaviour::Books(books) => books.iter().find(|b| b.id == id).cloned().ok_or(
                MimirError::UpstreamUnavailable {
                    status: Some(404),
                    message: "not found".into(),
                },
            ),
            Behaviour::Fail(err) => Err(err()),
        }
    }
}

// ============================================================================
// Mock backends
// ============================================================================

/// Memory backend that also records every write.
#[derive(Default)]
struct RecordingBackend {
    inner: MemoryBackend,
    writes: Mutex<Vec<(String, Duration)>>,
}

impl RecordingBackend {
    fn writes(&self) -> Vec<(String, Duration)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, payload: String, ttl: Duration) -> CacheResult<()> {
        self.writes.lock().unwrap().push((key.to_string(), ttl));
        self.inner.set(key, payload, ttl).await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.inner.delete(key).await
    }
}

/// Backend that is always down.
struct DownBackend;

#[async_trait]
impl CacheBackend for DownBackend {
    fn name(&self) -> &str {
        "down"
    }

    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn set(&self, _key: &str, _payload: String, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::Backend("connection refused".into()))
    }
}

fn catalog(
    provider: Arc<CountingProvider>,
) -> (ReadThroughCatalog, Arc<RecordingBackend>) {
    let backend = Arc::new(RecordingBackend::default());
    let catalog = ReadThroughCatalog::new(provider, CacheStore::new(backend.clone()));
    (catalog, backend)
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn cold_then_warm_search() {
    let provider = CountingProvider::with_books(vec![
        record("a", "en"),
        record("b", "en"),
        record("c", "fr"),
    ]);
    let (catalog, backend) = catalog(provider.clone());
    let query = SearchQuery::new("dune");

    let cold = catalog.search(&query).await.unwrap();
    assert_eq!(provider.calls(), 1);

    let warm = catalog.search(&query).await.unwrap();
    assert_eq!(provider.calls(), 1, "warm read must not reach upstream");
    assert_eq!(cold, warm);
    assert_eq!(warm.len(), 2);

    let writes = backend.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "books:v1:search:dune:en");
}

#[tokio::test]
async fn search_ttl_is_900_seconds() {
    let (catalog, backend) = catalog(CountingProvider::with_books(vec![record("a", "en")]));
    catalog.search(&SearchQuery::new("dune")).await.unwrap();

    assert_eq!(backend.writes()[0].1, Duration::from_secs(900));
}

#[tokio::test]
async fn equivalent_queries_share_an_entry() {
    let provider = CountingProvider::with_books(vec![record("a", "en")]);
    let (catalog, _) = catalog(provider.clone());

    catalog.search(&SearchQuery::new("Dune")).await.unwrap();
    catalog.search(&SearchQuery::new("  dune!! ")).await.unwrap();
    catalog
        .search(&SearchQuery::new("DUNE").max_results(5))
        .await
        .unwrap();

    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn languages_are_cached_separately() {
    let provider = CountingProvider::with_books(vec![record("a", "en"), record("b", "fr")]);
    let (catalog, _) = catalog(provider.clone());

    let en = catalog.search(&SearchQuery::new("dune")).await.unwrap();
    let fr = catalog
        .search(&SearchQuery::new("dune").language("fr"))
        .await
        .unwrap();

    assert_eq!(provider.calls(), 2);
    assert_eq!(en[0].id, "a");
    assert_eq!(fr[0].id, "b");
}

#[tokio::test]
async fn empty_results_are_cached() {
    let provider = CountingProvider::with_books(Vec::new());
    let (catalog, backend) = catalog(provider.clone());
    let query = SearchQuery::new("zzzzzz");

    assert!(catalog.search(&query).await.unwrap().is_empty());
    assert!(catalog.search(&query).await.unwrap().is_empty());

    assert_eq!(provider.calls(), 1);
    assert_eq!(backend.writes().len(), 1);
}

#[tokio::test]
async fn cached_list_is_truncated_to_cap() {
    let books: Vec<_> = (0..10).map(|i| record(&format!("b{i}"), "en")).collect();
    let provider = CountingProvider::with_books(books);
    let (catalog, _) = catalog(provider.clone());

    let all = catalog.search(&SearchQuery::new("dune")).await.unwrap();
    assert_eq!(all.len(), 10);

    let capped = catalog
        .search(&SearchQuery::new("dune").max_results(3))
        .await
        .unwrap();
    assert_eq!(provider.calls(), 1);
    let ids: Vec<_> = capped.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["b0", "b1", "b2"]);
}

#[tokio::test]
async fn small_cap_on_cold_read_does_not_shrink_the_entry() {
    let books: Vec<_> = (0..10).map(|i| record(&format!("b{i}"), "en")).collect();
    let provider = CountingProvider::with_books(books);
    let (catalog, _) = catalog(provider.clone());

    let small = catalog
        .search(&SearchQuery::new("dune").max_results(3))
        .await
        .unwrap();
    assert_eq!(small.len(), 3);

    let full = catalog
        .search(&SearchQuery::new("dune").max_results(40))
        .await
        .unwrap();
    assert_eq!(provider.calls(), 1);
    assert_eq!(full.len(), 10);
}

#[tokio::test]
async fn empty_query_uses_fallback_terms() {
    let provider = CountingProvider::with_books(Vec::new());
    let (catalog, backend) = catalog(provider.clone());

    catalog.search(&SearchQuery::new("   ")).await.unwrap();

    assert_eq!(
        provider.last_terms.lock().unwrap().as_deref(),
        Some("subject:fiction")
    );
    assert_eq!(backend.writes()[0].0, "books:v1:search:subject:fiction:en");
}

#[tokio::test]
async fn search_failure_propagates_and_is_not_cached() {
    let provider = CountingProvider::failing(|| MimirError::UpstreamRequest("bad".into()));
    let (catalog, backend) = catalog(provider.clone());
    let query = SearchQuery::new("dune");

    assert!(matches!(
        catalog.search(&query).await,
        Err(MimirError::UpstreamRequest(_))
    ));
    assert!(catalog.search(&query).await.is_err());

    // No retry, no negative caching
    assert_eq!(provider.calls(), 2);
    assert!(backend.writes().is_empty());
}

// ============================================================================
// Get by id
// ============================================================================

#[tokio::test]
async fn book_ttl_is_3600_seconds() {
    let provider = CountingProvider::with_books(vec![record("abc123", "en")]);
    let (catalog, backend) = catalog(provider.clone());

    let book = catalog.get_by_id("abc123").await.unwrap();
    assert_eq!(book.id, "abc123");

    let writes = backend.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "books:v1:book:abc123");
    assert_eq!(writes[0].1, Duration::from_secs(3600));
}

#[tokio::test]
async fn get_by_id_is_served_from_cache() {
    let provider = CountingProvider::with_books(vec![record("abc123", "en")]);
    let (catalog, _) = catalog(provider.clone());

    let first = catalog.get_by_id("abc123").await.unwrap();
    let second = catalog.get_by_id("abc123").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn get_by_id_auth_failure_is_not_cached() {
    let provider = CountingProvider::failing(|| MimirError::UpstreamAuth);
    let (catalog, backend) = catalog(provider.clone());

    let err = catalog.get_by_id("abc123").await.unwrap_err();
    assert!(err.is_credential_failure());
    assert!(backend.writes().is_empty());
}

#[tokio::test]
async fn blank_id_is_rejected_without_upstream_call() {
    let provider = CountingProvider::with_books(vec![record("abc123", "en")]);
    let (catalog, _) = catalog(provider.clone());

    for id in ["", "   "] {
        let err = catalog.get_by_id(id).await.unwrap_err();
        assert!(matches!(err, MimirError::InvalidInput(_)));
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn missing_book_keeps_not_found_status() {
    let (catalog, _) = catalog(CountingProvider::with_books(Vec::new()));

    let err = catalog.get_by_id("nope").await.unwrap_err();
    assert_eq!(err.http_status(), 404);
}

// ============================================================================
// Fail-open
// ============================================================================

#[tokio::test]
async fn cache_outage_falls_through_to_upstream() {
    let provider = CountingProvider::with_books(vec![record("abc123", "en")]);
    let catalog = ReadThroughCatalog::new(provider.clone(), CacheStore::new(Arc::new(DownBackend)));

    let book = catalog.get_by_id("abc123").await.unwrap();
    assert_eq!(book.id, "abc123");
    let books = catalog.search(&SearchQuery::new("dune")).await.unwrap();
    assert_eq!(books.len(), 1);

    // Every request goes upstream while the cache is down
    catalog.get_by_id("abc123").await.unwrap();
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn corrupt_entry_is_refetched() {
    let provider = CountingProvider::with_books(vec![record("abc123", "en")]);
    let (catalog, backend) = catalog(provider.clone());

    backend
        .inner
        .set(
            "books:v1:book:abc123",
            "{\"unexpected\":true}".into(),
            Duration::from_secs(60),
        )
        .await
        .unwrap();

    let book = catalog.get_by_id("abc123").await.unwrap();
    assert_eq!(book.id, "abc123");
    assert_eq!(provider.calls(), 1);
}

// ============================================================================
// Bestsellers and invalidation
// ============================================================================

#[tokio::test]
async fn bestsellers_search_current_year() {
    let provider = CountingProvider::with_books(vec![record("a", "de")]);
    let (catalog, backend) = catalog(provider.clone());

    let books = catalog.bestsellers("de").await.unwrap();
    assert_eq!(books.len(), 1);

    let year = Utc::now().year();
    assert_eq!(
        provider.last_terms.lock().unwrap().clone(),
        Some(format!("subject:bestseller {year}"))
    );
    assert_eq!(
        backend.writes()[0].0,
        format!("books:v1:search:subject:bestseller {year}:de")
    );
}

#[tokio::test]
async fn bestsellers_share_the_search_cache() {
    let provider = CountingProvider::with_books(vec![record("a", "en")]);
    let (catalog, _) = catalog(provider.clone());

    catalog.bestsellers_for_year(2024, "en").await.unwrap();
    catalog
        .search(&SearchQuery::new("").category("Bestseller 2024"))
        .await
        .unwrap();

    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn invalidate_forces_refetch() {
    let provider = CountingProvider::with_books(vec![record("abc123", "en")]);
    let (catalog, _) = catalog(provider.clone());
    let query = SearchQuery::new("dune");

    catalog.get_by_id("abc123").await.unwrap();
    catalog.search(&query).await.unwrap();
    assert_eq!(provider.calls(), 2);

    catalog.invalidate_book("abc123").await.unwrap();
    catalog.invalidate_search(&query).await;

    catalog.get_by_id("abc123").await.unwrap();
    catalog.search(&query).await.unwrap();
    assert_eq!(provider.calls(), 4);
}

#[tokio::test]
async fn invalidate_blank_id_is_rejected() {
    let (catalog, _) = catalog(CountingProvider::with_books(Vec::new()));
    assert!(matches!(
        catalog.invalidate_book(" ").await,
        Err(MimirError::InvalidInput(_))
    ));
}

// ============================================================================
// Builder
// ============================================================================

#[test]
fn builder_without_provider_fails() {
    let result = Mimir::builder().build();
    assert!(matches!(result, Err(MimirError::NoProvider)));
}

#[test]
fn builder_rejects_blank_api_key() {
    let result = Mimir::builder().google_books("  ").build();
    assert!(matches!(result, Err(MimirError::Configuration(_))));
}

#[tokio::test]
async fn builder_applies_prefix_and_ttl() {
    let provider = CountingProvider::with_books(vec![record("abc123", "en")]);
    let backend = Arc::new(RecordingBackend::default());

    let catalog = Mimir::builder()
        .provider(provider.clone())
        .cache_backend(backend.clone())
        .key_prefix("staging:books:v1")
        .search_ttl(Duration::from_secs(60))
        .build()
        .unwrap();

    assert_eq!(catalog.provider_name(), "counting");
    assert_eq!(catalog.cache().backend_name(), "recording");

    catalog.get_by_id("abc123").await.unwrap();
    catalog.search(&SearchQuery::new("dune")).await.unwrap();

    let writes = backend.writes();
    assert_eq!(writes[0].0, "staging:books:v1:book:abc123");
    assert_eq!(writes[0].1, Duration::from_secs(240));
    assert_eq!(writes[1].0, "staging:books:v1:search:dune:en");
    assert_eq!(writes[1].1, Duration::from_secs(60));
}

#[test]
fn builder_defaults_to_memory_backend() {
    let catalog = Mimir::builder()
        .google_books("test-key")
        .build()
        .unwrap();
    assert_eq!(catalog.provider_name(), "google_books");
    assert_eq!(catalog.cache().backend_name(), "memory");
}

#[cfg(feature = "redis")]
#[test]
fn builder_selects_redis_backend() {
    let catalog = Mimir::builder()
        .google_books("test-key")
        .redis("redis://127.0.0.1:6379/0")
        .build()
        .unwrap();
    assert_eq!(catalog.cache().backend_name(), "redis");
}
