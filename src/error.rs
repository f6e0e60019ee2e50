//! Mimir error types

/// Mimir error types
///
/// Cache failures never appear here: they are absorbed by
/// [`CacheStore`](crate::cache::CacheStore) and reported as
/// [`CacheError`](crate::cache::CacheError) to the logs only.
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    // Caller errors
    /// Missing or malformed caller input. No upstream call is attempted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Upstream errors
    /// The catalog provider rejected the API key (HTTP 403).
    #[error("invalid or expired API key")]
    UpstreamAuth,

    /// The catalog provider rejected the request as malformed (HTTP 400).
    #[error("invalid request to catalog provider: {0}")]
    UpstreamRequest(String),

    /// Any other upstream failure: non-success status, network error, or an
    /// unparsable payload. `status` is `None` when no response was received.
    #[error("catalog provider unavailable: {message}")]
    UpstreamUnavailable {
        status: Option<u16>,
        message: String,
    },

    // Configuration errors
    #[error("no catalog provider configured")]
    NoProvider,

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl MimirError {
    /// Build an [`UpstreamUnavailable`](Self::UpstreamUnavailable) for a
    /// failure that produced no HTTP response.
    pub fn unavailable(message: impl Into<String>) -> Self {
        MimirError::UpstreamUnavailable {
            status: None,
            message: message.into(),
        }
    }

    /// Whether the upstream refused our credential.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, MimirError::UpstreamAuth)
    }

    /// Upstream HTTP status attached to this error, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            MimirError::UpstreamAuth => Some(403),
            MimirError::UpstreamRequest(_) => Some(400),
            MimirError::UpstreamUnavailable { status, .. } => *status,
            _ => None,
        }
    }

    /// HTTP status for the inbound boundary.
    ///
    /// Caller input errors are 400. An upstream 404 is passed through so a
    /// missing volume reads as not-found; everything else is 500.
    pub fn http_status(&self) -> u16 {
        match self {
            MimirError::InvalidInput(_) => 400,
            MimirError::UpstreamUnavailable {
                status: Some(404), ..
            } => 404,
            _ => 500,
        }
    }
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;
