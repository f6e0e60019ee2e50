//! Google Books API client for volume search and lookup.
//!
//! See: <https://developers.google.com/books/docs/v1/using>

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use super::language::language_term;
use super::traits::CatalogProvider;
use crate::telemetry;
use crate::types::{CatalogRecord, SearchQuery, validate_volume};
use crate::{MimirError, Result};

/// Default base URL for the Google Books API
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";

const PROVIDER_NAME: &str = "google_books";

/// Client for the Google Books API.
///
/// Supports:
/// - Volume search (`GET /volumes`) with language restriction
/// - Single volume lookup (`GET /volumes/{id}`)
#[derive(Clone)]
pub struct GoogleBooksClient {
    api_key: String,
    http: Client,
    base_url: Url,
}

impl GoogleBooksClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl AsRef<str>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(MimirError::Configuration(
                "Google Books API key is empty".to_string(),
            ));
        }

        let base_url = Url::parse(base_url.as_ref()).map_err(|e| {
            MimirError::Configuration(format!(
                "invalid catalog base URL {:?}: {e}",
                base_url.as_ref()
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(MimirError::Configuration(format!(
                "catalog base URL cannot carry a path: {base_url}"
            )));
        }

        Ok(Self {
            api_key,
            http: Client::new(),
            base_url,
        })
    }

    /// Use a shared HTTP client (connection pool) instead of a private one.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Full `q` parameter for a search: sanitized terms followed by the
    /// language restriction term.
    pub fn format_query(query: &SearchQuery) -> String {
        format!(
            "{} {}",
            query.upstream_terms(),
            language_term(&query.language)
        )
    }

    /// Search volumes.
    ///
    /// Items failing validation are dropped, then only items whose declared
    /// language equals `query.language` are kept: `langRestrict` is treated
    /// as a hint.
    #[instrument(name = "catalog.search", skip(self, query), fields(provider = PROVIDER_NAME, language = %query.language))]
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogRecord>> {
        let start = Instant::now();
        let result = self.fetch_search(query).await;
        record_request("search", start, result.is_ok());
        result
    }

    /// Fetch a single volume by ID.
    #[instrument(name = "catalog.get_volume", skip(self), fields(provider = PROVIDER_NAME))]
    pub async fn get_volume(&self, id: &str) -> Result<CatalogRecord> {
        let start = Instant::now();
        let result = self.fetch_volume(id).await;
        record_request("get_volume", start, result.is_ok());
        result
    }

    async fn fetch_search(&self, query: &SearchQuery) -> Result<Vec<CatalogRecord>> {
        let q = Self::format_query(query);
        let max_results = query.result_limit().to_string();
        let url = self.endpoint(&["volumes"]);

        debug!(q = %q, max_results = %max_results, "requesting volumes");

        let response = self
            .http
            .get(url)
            .query(&[
                ("q", q.as_str()),
                ("maxResults", max_results.as_str()),
                ("langRestrict", query.language.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(request_failed)?;

        let response = handle_response_errors(response, "Invalid search query or API key").await?;
        let body: VolumesResponse = read_json(response).await?;

        let items = body.items.unwrap_or_default();
        if items.is_empty() {
            info!(q = %q, "no books found");
            return Ok(Vec::new());
        }

        let returned = items.len();
        let valid: Vec<CatalogRecord> = items
            .into_iter()
            .filter_map(|raw| match validate_volume(raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "dropping invalid volume from search results");
                    count_dropped("schema", 1);
                    None
                }
            })
            .collect();

        let valid_count = valid.len();
        let records: Vec<CatalogRecord> = valid
            .into_iter()
            .filter(|record| record.is_language(&query.language))
            .collect();
        count_dropped("language", valid_count - records.len());

        debug!(
            returned,
            valid = valid_count,
            kept = records.len(),
            "search results filtered"
        );
        Ok(records)
    }

    async fn fetch_volume(&self, id: &str) -> Result<CatalogRecord> {
        let url = self.endpoint(&["volumes", id]);

        debug!(id, "requesting volume");

        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(request_failed)?;

        let response = handle_response_errors(response, "Invalid book ID").await?;
        let raw: serde_json::Value = read_json(response).await?;

        validate_volume(raw).map_err(|e| {
            error!(id, error = %e, "volume payload failed validation");
            MimirError::unavailable(format!("invalid volume payload: {e}"))
        })
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base URLs are rejected at construction
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumesResponse {
    #[serde(default)]
    items: Option<Vec<serde_json::Value>>,
}

/// Check response status and map to the appropriate error.
///
/// 400 → [`UpstreamRequest`](MimirError::UpstreamRequest), 403 →
/// [`UpstreamAuth`](MimirError::UpstreamAuth), any other non-2xx →
/// [`UpstreamUnavailable`](MimirError::UpstreamUnavailable) with the status.
async fn handle_response_errors(response: Response, bad_request: &str) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    // Upstream error bodies are for operators, never for callers
    let body = response.text().await.unwrap_or_default();
    error!(status = status.as_u16(), body = %body, "Google Books API error");

    match status.as_u16() {
        400 => Err(MimirError::UpstreamRequest(bad_request.to_string())),
        403 => Err(MimirError::UpstreamAuth),
        code => Err(MimirError::UpstreamUnavailable {
            status: Some(code),
            message: format!("Google Books API error: {status}"),
        }),
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await.map_err(request_failed)?;
    serde_json::from_str(&body).map_err(|e| {
        error!(error = %e, "unparsable Google Books response");
        MimirError::unavailable(format!("unparsable response body: {e}"))
    })
}

fn request_failed(err: reqwest::Error) -> MimirError {
    // The request URL carries the API key
    let err = err.without_url();
    error!(error = %err, "Google Books request failed");
    MimirError::unavailable(format!("request failed: {err}"))
}

/// Record request outcome metrics (counter + histogram).
fn record_request(operation: &'static str, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL,
        "provider" => PROVIDER_NAME,
        "operation" => operation,
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::UPSTREAM_REQUEST_DURATION_SECONDS,
        "provider" => PROVIDER_NAME,
        "operation" => operation,
    )
    .record(start.elapsed().as_secs_f64());
}

fn count_dropped(reason: &'static str, n: usize) {
    if n > 0 {
        metrics::counter!(telemetry::RECORDS_DROPPED_TOTAL, "reason" => reason)
            .increment(n as u64);
    }
}

// ============================================================================
// Provider Trait Implementation
// ============================================================================

#[async_trait]
impl CatalogProvider for GoogleBooksClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogRecord>> {
        GoogleBooksClient::search(self, query).await
    }

    async fn get_volume(&self, id: &str) -> Result<CatalogRecord> {
        GoogleBooksClient::get_volume(self, id).await
    }
}
