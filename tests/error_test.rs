use mimir::{MimirError, Result};

#[test]
fn test_error_display() {
    let err = MimirError::InvalidInput("book id is required".to_string());
    assert!(err.to_string().contains("book id is required"));
}

#[test]
fn test_auth_error_message_is_generic() {
    assert_eq!(
        MimirError::UpstreamAuth.to_string(),
        "invalid or expired API key"
    );
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(MimirError::NoProvider)
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn credential_failures() {
    assert!(MimirError::UpstreamAuth.is_credential_failure());
    assert!(!MimirError::UpstreamRequest("bad".into()).is_credential_failure());
    assert!(!MimirError::unavailable("down").is_credential_failure());
}

#[test]
fn upstream_status_is_attached() {
    assert_eq!(MimirError::UpstreamAuth.upstream_status(), Some(403));
    assert_eq!(
        MimirError::UpstreamRequest("bad".into()).upstream_status(),
        Some(400)
    );
    assert_eq!(
        MimirError::UpstreamUnavailable {
            status: Some(503),
            message: "unavailable".into()
        }
        .upstream_status(),
        Some(503)
    );
    // Network failure: no response, no status
    assert_eq!(MimirError::unavailable("reset").upstream_status(), None);
    assert_eq!(MimirError::InvalidInput("q".into()).upstream_status(), None);
}

// ============================================================================
// Boundary status mapping
// ============================================================================

#[test]
fn invalid_input_is_bad_request() {
    assert_eq!(MimirError::InvalidInput("q".into()).http_status(), 400);
}

#[test]
fn upstream_not_found_passes_through() {
    let err = MimirError::UpstreamUnavailable {
        status: Some(404),
        message: "not found".into(),
    };
    assert_eq!(err.http_status(), 404);
}

#[test]
fn other_failures_are_internal() {
    assert_eq!(MimirError::UpstreamAuth.http_status(), 500);
    assert_eq!(MimirError::UpstreamRequest("bad".into()).http_status(), 500);
    assert_eq!(MimirError::unavailable("down").http_status(), 500);
    assert_eq!(
        MimirError::UpstreamUnavailable {
            status: Some(502),
            message: "bad gateway".into()
        }
        .http_status(),
        500
    );
    assert_eq!(MimirError::NoProvider.http_status(), 500);
}
