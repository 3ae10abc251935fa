//! Integration tests for error type construction and display.

use logpulse::util::error::LogPulseError;

#[test]
fn unauthorized_is_not_transient() {
    let err = LogPulseError::Unauthorized;
    assert!(err.is_unauthorized());
    assert!(!err.is_transient());
}

#[test]
fn network_error_is_transient_and_preserves_message() {
    let err = LogPulseError::Network("logs: HTTP 503 Service Unavailable".into());
    assert!(err.is_transient());
    assert!(!err.is_unauthorized());
    let msg = err.to_string();
    assert!(msg.contains("503"), "Should contain detail: {msg}");
}

#[test]
fn malformed_response_is_transient() {
    let err = LogPulseError::MalformedResponse("missing field `logs`".into());
    assert!(err.is_transient());
    assert!(err.to_string().contains("missing field"));
}

#[test]
fn config_and_export_errors_are_neither() {
    for err in [
        LogPulseError::Config("bad".into()),
        LogPulseError::Export("disk full".into()),
    ] {
        assert!(!err.is_transient());
        assert!(!err.is_unauthorized());
    }
}

#[test]
fn io_error_converts() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no access");
    let err: LogPulseError = io_err.into();
    let msg = err.to_string();
    assert!(msg.contains("no access"), "Should preserve IO error: {msg}");
}

#[test]
fn error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    // Errors cross the scheduler thread boundary.
    assert_send_sync::<LogPulseError>();
}
