//! Catalog provider trait.
//!
//! A provider turns one domain request into exactly one upstream call and
//! returns validated records. Providers own validation and the language
//! post-filter, so whatever they return is safe to cache as-is.
//!
//! # Example
//!
//! ```ignore
//! #[async_trait]
//! impl CatalogProvider for FixtureProvider {
//!     fn name(&self) -> &str { "fixture" }
//!
//!     async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogRecord>> {
//!         Ok(self.records.iter().filter(|r| r.is_language(&query.language)).cloned().collect())
//!     }
//!
//!     async fn get_volume(&self, id: &str) -> Result<CatalogRecord> {
//!         self.records.iter().find(|r| r.id == id).cloned()
//!             .ok_or_else(|| MimirError::UpstreamUnavailable { status: Some(404), message: id.into() })
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::Result;
use crate::types::{CatalogRecord, SearchQuery};

/// Upstream book catalog.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Provider name for logging/metrics.
    fn name(&self) -> &str;

    /// Search the catalog.
    ///
    /// Returns only records that passed validation and whose declared
    /// language equals `query.language`. An upstream success with no items
    /// is an empty list, not an error.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogRecord>>;

    /// Fetch one volume by identifier.
    ///
    /// A payload that fails validation is an
    /// [`UpstreamUnavailable`](crate::MimirError::UpstreamUnavailable) error.
    async fn get_volume(&self, id: &str) -> Result<CatalogRecord>;
}
