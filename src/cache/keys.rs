//! Cache key derivation and TTL policy.
//!
//! Keys are a pure function of (entity kind, identifier-or-terms,
//! language):
//!
//! ```text
//! {prefix}:book:{id}
//! {prefix}:search:{terms}:{language}
//! ```
//!
//! The default prefix carries a payload schema version (`books:v1`). Bumping
//! it when the record shape or the post-fetch filtering changes keeps old
//! entries from being served under the new logic; they simply expire.

use std::time::Duration;

use crate::types::SearchQuery;

/// Current payload schema version, embedded in the default key prefix.
pub const KEY_SCHEMA_VERSION: u32 = 1;

/// Default search-result TTL (15 minutes).
pub const DEFAULT_SEARCH_TTL: Duration = Duration::from_secs(15 * 60);

/// Single-book TTL as a multiple of the search TTL.
pub const BOOK_TTL_FACTOR: u32 = 4;

/// Kind of cached entity; decides the TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// One [`CatalogRecord`](crate::CatalogRecord).
    Book,
    /// A search result list.
    Search,
}

impl EntityKind {
    /// Key namespace segment.
    pub fn namespace(self) -> &'static str {
        match self {
            EntityKind::Book => "book",
            EntityKind::Search => "search",
        }
    }
}

/// TTL per entity kind.
///
/// Single-book entries always live [`BOOK_TTL_FACTOR`] times longer than
/// search results: individual records change less often than rankings. No
/// jitter is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    search_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            search_ttl: DEFAULT_SEARCH_TTL,
        }
    }
}

impl CachePolicy {
    /// Reference policy: 3600s for books, 900s for searches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy derived from a search TTL; the book TTL follows at 4×.
    pub fn from_search_ttl(search_ttl: Duration) -> Self {
        Self { search_ttl }
    }

    /// TTL for an entity kind.
    pub fn ttl(&self, kind: EntityKind) -> Duration {
        match kind {
            EntityKind::Book => self.search_ttl * BOOK_TTL_FACTOR,
            EntityKind::Search => self.search_ttl,
        }
    }
}

/// Builds cache keys under a fixed prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBuilder {
    prefix: String,
}

impl Default for KeyBuilder {
    fn default() -> Self {
        Self {
            prefix: format!("books:v{KEY_SCHEMA_VERSION}"),
        }
    }
}

impl KeyBuilder {
    /// Builder with the default `books:v1` prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with a custom prefix (e.g. to share one Redis between
    /// deployments). Trailing colons are trimmed.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches(':').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key for a single book.
    pub fn book(&self, id: &str) -> String {
        format!("{}:{}:{}", self.prefix, EntityKind::Book.namespace(), id.trim())
    }

    /// Key for a search result list.
    pub fn search(&self, query: &SearchQuery) -> String {
        format!(
            "{}:{}:{}:{}",
            self.prefix,
            EntityKind::Search.namespace(),
            query.terms(),
            query.language
        )
    }
}
