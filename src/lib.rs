//! Mimir - read-through cache for book catalog APIs
//!
//! This crate puts a cache in front of a rate-limited book catalog (the
//! Google Books API). Reads consult the cache first; misses go upstream
//! once and the validated, language-filtered result is written back with a
//! TTL that depends on what was fetched. Cache outages degrade to
//! "always fetch upstream" and never fail a request.
//!
//! # Search Example
//!
//! ```rust,no_run
//! use mimir::{Mimir, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> mimir::Result<()> {
//!     let catalog = Mimir::builder()
//!         .google_books("your-api-key")
//!         .build()?;
//!
//!     let query = SearchQuery::new("dune").language("en").max_results(10);
//!     for book in catalog.search(&query).await? {
//!         println!("{} ({})", book.title, book.authors.join(", "));
//!     }
//!
//!     let book = catalog.get_by_id("B1hSG45JCX4C").await?;
//!     println!("{}", book.info_link);
//!     Ok(())
//! }
//! ```
//!
//! # Shared Cache Example (requires `redis` feature)
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use mimir::Mimir;
//!
//! let catalog = Mimir::builder()
//!     .google_books(api_key)
//!     .redis("redis://127.0.0.1:6379/0")
//!     .search_ttl(Duration::from_secs(600))
//!     .build()?;
//! ```

pub mod cache;
pub mod catalog;
pub mod error;
pub mod gateway;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use cache::{CacheBackend, CacheConfig, CachePolicy, CacheStore, EntityKind, KeyBuilder};
pub use catalog::{CatalogProvider, GoogleBooksClient};
pub use error::{MimirError, Result};
pub use gateway::{Mimir, MimirBuilder, ReadThroughCatalog};
pub use types::{CatalogRecord, ImageLinks, SchemaViolation, SearchQuery};
pub use version::{BuildInfo, PKG_VERSION, version_string};
