//! Unified error types for LogPulse.
//!
//! All fallible operations throughout the codebase return `Result<T, LogPulseError>`.
//! This ensures consistent error reporting and clean propagation via the `?` operator.

/// Unified error type used throughout LogPulse.
///
/// The first three variants form the fetch taxonomy: only `Unauthorized`
/// ends a monitoring session, the other two skip a single cycle.
#[derive(Debug, thiserror::Error)]
pub enum LogPulseError {
    /// The backend rejected the bearer token (HTTP 401).
    #[error("Unauthorized: session token rejected by backend")]
    Unauthorized,

    /// Transport failure, timeout, or a non-2xx status other than 401.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not have the expected JSON shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Export (CSV or JSON) failed, typically an I/O error.
    #[error("Export failed: {0}")]
    Export(String),

    /// Catch-all for I/O errors (file writes, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogPulseError {
    /// `true` when the session must end and the caller should clear credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, LogPulseError::Unauthorized)
    }

    /// `true` for failures that only skip the current cycle.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LogPulseError::Network(_) | LogPulseError::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for LogPulseError {
    fn from(e: reqwest::Error) -> Self {
        if e.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            LogPulseError::Unauthorized
        } else if e.is_decode() {
            LogPulseError::MalformedResponse(e.to_string())
        } else {
            LogPulseError::Network(e.to_string())
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LogPulseError>;
