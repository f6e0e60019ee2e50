//! Upstream catalog providers.
//!
//! - [`CatalogProvider`]: the seam the read-through layer calls.
//! - [`GoogleBooksClient`]: the Google Books implementation.

pub mod google_books;
pub mod language;
pub mod traits;

pub use google_books::GoogleBooksClient;
pub use language::language_term;
pub use traits::CatalogProvider;
