//! Backend access for the monitoring session.
//!
//! [`LogSource`] is the seam between the poll cycle and the network: the
//! scheduler only ever talks to the trait, and [`HttpLogSource`] is the
//! production implementation over blocking `reqwest`. Each call issues
//! exactly one request.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;

use crate::core::config::MonitorConfig;
use crate::core::log_record::{
    parse_latest_report_body, parse_logs_body, AnalysisReport, LogRecord,
};
use crate::util::constants::{ANALYSIS_REPORTS_PATH, LOGS_PATH};
use crate::util::error::{LogPulseError, Result};
use crate::util::time::format_cursor;

/// Source of log batches and analysis reports.
pub trait LogSource: Send + Sync {
    /// Fetch records strictly newer than `cursor` (all records if `None`),
    /// ordered oldest to newest.
    fn fetch_logs(&self, cursor: Option<DateTime<Utc>>, token: &str) -> Result<Vec<LogRecord>>;

    /// Fetch the single most recent analysis report, if any.
    fn fetch_latest_report(&self, token: &str) -> Result<Option<AnalysisReport>>;
}

/// [`LogSource`] backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpLogSource {
    client: Client,
    base_url: String,
}

impl HttpLogSource {
    /// Build a client with the configured request timeout.
    ///
    /// # Errors
    /// Returns [`LogPulseError::Config`] if the TLS backend cannot be initialised.
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LogPulseError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl LogSource for HttpLogSource {
    fn fetch_logs(&self, cursor: Option<DateTime<Utc>>, token: &str) -> Result<Vec<LogRecord>> {
        let url = self.endpoint(LOGS_PATH);
        let query = logs_query(cursor);
        tracing::debug!("GET {} {:?}", url, query);

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .bearer_auth(token)
            .send()?;
        let body = check_status(resp, "logs")?.text()?;
        parse_logs_body(&body)
    }

    fn fetch_latest_report(&self, token: &str) -> Result<Option<AnalysisReport>> {
        let url = self.endpoint(ANALYSIS_REPORTS_PATH);
        tracing::debug!("GET {}?limit=1", url);

        let resp = self
            .client
            .get(&url)
            .query(&[("limit", "1")])
            .bearer_auth(token)
            .send()?;
        let body = check_status(resp, "analysis_reports")?.text()?;
        parse_latest_report_body(&body)
    }
}

/// Query parameters for `GET /logs`. `start` is omitted on the first call.
pub fn logs_query(cursor: Option<DateTime<Utc>>) -> Vec<(&'static str, String)> {
    cursor
        .map(|ts| vec![("start", format_cursor(&ts))])
        .unwrap_or_default()
}

/// Map HTTP status onto the fetch error taxonomy.
fn check_status(resp: Response, what: &str) -> Result<Response> {
    classify_status(resp.status(), what)?;
    Ok(resp)
}

/// 401 is `Unauthorized`; any other non-2xx status is a `Network` failure.
pub fn classify_status(status: StatusCode, what: &str) -> Result<()> {
    if status == StatusCode::UNAUTHORIZED {
        Err(LogPulseError::Unauthorized)
    } else if !status.is_success() {
        Err(LogPulseError::Network(format!("{what}: HTTP {status}")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_logs_query_omits_start_without_cursor() {
        assert!(logs_query(None).is_empty());
    }

    #[test]
    fn test_logs_query_with_cursor() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let q = logs_query(Some(ts));
        assert_eq!(q, vec![("start", "2024-01-15T10:00:00Z".to_string())]);
    }

    #[test]
    fn test_classify_status() {
        assert!(classify_status(StatusCode::OK, "logs").is_ok());
        assert!(classify_status(StatusCode::UNAUTHORIZED, "logs")
            .unwrap_err()
            .is_unauthorized());
        let err = classify_status(StatusCode::BAD_GATEWAY, "logs").unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = MonitorConfig {
            base_url: "http://backend:5000/".into(),
            ..MonitorConfig::default()
        };
        let source = HttpLogSource::new(&config).unwrap();
        assert_eq!(source.base_url(), "http://backend:5000");
        assert_eq!(source.endpoint(LOGS_PATH), "http://backend:5000/logs");
    }

    #[test]
    fn test_unreachable_backend_is_network_error() {
        let config = MonitorConfig {
            // Port 9 (discard) on localhost is closed in test environments.
            base_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: 2,
            ..MonitorConfig::default()
        };
        let source = HttpLogSource::new(&config).unwrap();
        let err = source.fetch_logs(None, "token").unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err}");
    }
}
