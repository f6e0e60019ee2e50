//! Telemetry metric name constants.
//!
//! Centralised metric names for mimir operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mimir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `backend`: cache backend name ("memory", "redis")
//! - `operation`: "get", "set", "delete" for the cache; "search",
//!   "get_volume" for the upstream
//! - `status`: outcome: "ok" or "error"

/// Total cache hits.
///
/// Labels: `backend`.
pub const CACHE_HITS_TOTAL: &str = "mimir_cache_hits_total";

/// Total cache misses (including reads degraded by a backend failure).
///
/// Labels: `backend`.
pub const CACHE_MISSES_TOTAL: &str = "mimir_cache_misses_total";

/// Total cache backend failures absorbed by the fail-open store.
///
/// Labels: `backend`, `operation`.
pub const CACHE_ERRORS_TOTAL: &str = "mimir_cache_errors_total";

/// Cache operation duration in seconds.
///
/// Labels: `backend`, `operation`.
pub const CACHE_OPERATION_DURATION_SECONDS: &str = "mimir_cache_operation_duration_seconds";

/// Total requests sent to the catalog provider.
///
/// Labels: `provider`, `operation`, `status` ("ok" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "mimir_upstream_requests_total";

/// Catalog provider request duration in seconds.
///
/// Labels: `provider`, `operation`.
pub const UPSTREAM_REQUEST_DURATION_SECONDS: &str = "mimir_upstream_request_duration_seconds";

/// Records dropped after fetch, either by schema validation or the
/// language post-filter.
///
/// Labels: `reason` ("schema" | "language").
pub const RECORDS_DROPPED_TOTAL: &str = "mimir_records_dropped_total";
