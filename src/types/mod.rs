//! Domain types: catalog records, search queries, and payload validation.

pub mod query;
pub mod record;
pub mod validation;

pub use query::{
    BESTSELLER_CATEGORY, DEFAULT_LANGUAGE, FALLBACK_TERMS, MAX_RESULTS_LIMIT, SearchQuery,
    sanitize,
};
pub use record::{CatalogRecord, ImageLinks};
pub use validation::{SchemaViolation, validate_volume};
