//! HTTP boundary for the read-through catalog.
//!
//! Routes:
//! - `GET /api/books/search?q=&maxResults=&language=&category=` → `{ "books": [...] }`
//! - `GET /api/books/bestsellers?language=` → `{ "books": [...] }`
//! - `GET /api/books/{id}` → `{ "book": {...} }`
//! - `GET /health`
//!
//! Errors are `{ "error": <message> }` with a generic message; the typed
//! error is logged server-side and never returned.

pub mod config;

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::MimirError;
use crate::gateway::ReadThroughCatalog;
use crate::types::{CatalogRecord, SearchQuery};
use crate::version::BuildInfo;

/// Shared handler state.
pub type AppState = Arc<ReadThroughCatalog>;

/// Build the HTTP router.
pub fn build_router(catalog: AppState) -> Router {
    Router::new()
        .route("/api/books/search", get(search_books))
        .route("/api/books/bestsellers", get(bestsellers))
        .route("/api/books/{id}", get(get_book))
        .route("/health", get(health))
        .with_state(catalog)
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler error: a status plus a generic message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.to_string(),
            },
        }
    }

    /// Log `err` and map it to its boundary status with `message`.
    fn from_catalog(message: &str, err: &MimirError) -> Self {
        error!(error = %err, "{message}");
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BooksResponse {
    pub books: Vec<CatalogRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub book: CatalogRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    q: Option<String>,
    // Kept as text so a malformed number means "default", not a 400
    max_results: Option<String>,
    #[serde(alias = "lang")]
    language: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BestsellerParams {
    #[serde(alias = "lang")]
    language: Option<String>,
}

async fn search_books(
    State(catalog): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<BooksResponse>, ApiError> {
    let text = params.q.unwrap_or_default();
    let has_category = params
        .category
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());
    if text.trim().is_empty() && !has_category {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Query parameter is required",
        ));
    }

    let mut query = SearchQuery::new(text);
    if let Some(language) = params.language {
        query = query.language(language);
    }
    if let Some(category) = params.category {
        query = query.category(category);
    }
    if let Some(n) = params.max_results.and_then(|n| n.trim().parse().ok()) {
        query = query.max_results(n);
    }

    let books = catalog
        .search(&query)
        .await
        .map_err(|e| ApiError::from_catalog("Failed to search books", &e))?;
    Ok(Json(BooksResponse { books }))
}

async fn bestsellers(
    State(catalog): State<AppState>,
    Query(params): Query<BestsellerParams>,
) -> Result<Json<BooksResponse>, ApiError> {
    let language = params.language.unwrap_or_default();
    let books = catalog
        .bestsellers(&language)
        .await
        .map_err(|e| ApiError::from_catalog("Failed to get bestsellers", &e))?;
    Ok(Json(BooksResponse { books }))
}

async fn get_book(
    State(catalog): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = catalog
        .get_by_id(&id)
        .await
        .map_err(|e| ApiError::from_catalog("Failed to get book", &e))?;
    Ok(Json(BookResponse { book }))
}

async fn health() -> impl IntoResponse {
    let build = BuildInfo::current();
    Json(serde_json::json!({
        "status": "ok",
        "version": build.to_string(),
        "build": build,
    }))
}
