//! Canonical data structures for security log records and analysis reports.
//!
//! The backend sends loosely-shaped JSON where every nested field may be
//! missing. The `Wire*` structs mirror that shape with optional fields; the
//! public [`LogRecord`] and [`AnalysisReport`] types are the validated,
//! immutable form the rest of the crate works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::error::LogPulseError;
use crate::util::time::parse_wire_timestamp;

/// Ordinal severity of a log record or report.
///
/// Classification is total: any input string maps to one of the four
/// buckets, and anything unrecognised (including empty) is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl Severity {
    /// Classify a raw severity string, case-insensitively.
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            _ => Severity::Unknown,
        }
    }

    /// Classify an optional raw severity; absence is `Unknown`.
    pub fn classify_opt(raw: Option<&str>) -> Self {
        raw.map(Self::classify).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single security event as fetched from the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    /// Opaque unique identifier. Empty if the backend omitted it.
    pub id: String,

    /// When the event occurred, in UTC.
    pub timestamp: DateTime<Utc>,

    /// Free-text event type, e.g. `"login failure"` or `"response 120ms"`.
    pub event_type: String,

    /// Classified severity.
    pub severity: Severity,

    /// Source IP address as sent by the backend.
    pub source_ip: String,
}

/// The most recent AI-generated assessment.
///
/// Treated as a point-in-time snapshot; only the latest one matters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub severity: Severity,
    pub suggested_actions: Vec<String>,
    pub summary: Option<String>,
    pub attack_type: Option<String>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

// ── Wire shapes ─────────────────────────────────────────────────────────

/// Body of `GET /logs`.
#[derive(Debug, Deserialize)]
pub struct WireLogsResponse {
    pub logs: Vec<WireLogRecord>,
}

#[derive(Debug, Deserialize)]
pub struct WireLogRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub event: Option<WireEvent>,
    #[serde(default)]
    pub source: Option<WireSource>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireEvent {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireSource {
    #[serde(default)]
    pub ip: Option<String>,
}

/// Body of `GET /analysis_reports`.
#[derive(Debug, Deserialize)]
pub struct WireReportsResponse {
    #[serde(default)]
    pub reports: Vec<WireReport>,
}

#[derive(Debug, Deserialize)]
pub struct WireReport {
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub attack_type: Option<String>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
}

impl TryFrom<WireLogRecord> for LogRecord {
    type Error = LogPulseError;

    /// A record without a parseable timestamp cannot take part in cursor
    /// advancement, so it is rejected.
    fn try_from(wire: WireLogRecord) -> Result<Self, Self::Error> {
        let raw_ts = wire.timestamp.unwrap_or_default();
        let timestamp = parse_wire_timestamp(&raw_ts).ok_or_else(|| {
            LogPulseError::MalformedResponse(format!("unparseable log timestamp '{raw_ts}'"))
        })?;
        let event = wire.event.unwrap_or_default();

        Ok(LogRecord {
            id: wire.id.unwrap_or_default(),
            timestamp,
            event_type: event.event_type.unwrap_or_default(),
            severity: Severity::classify_opt(event.severity.as_deref()),
            source_ip: wire.source.unwrap_or_default().ip.unwrap_or_default(),
        })
    }
}

impl From<WireReport> for AnalysisReport {
    fn from(wire: WireReport) -> Self {
        AnalysisReport {
            severity: Severity::classify_opt(wire.severity.as_deref()),
            suggested_actions: wire.suggested_actions,
            summary: wire.summary,
            attack_type: wire.attack_type,
            analyzed_at: wire.analyzed_at.as_deref().and_then(parse_wire_timestamp),
        }
    }
}

/// Decode a `/logs` response body into validated records, preserving order.
pub fn parse_logs_body(body: &str) -> Result<Vec<LogRecord>, LogPulseError> {
    let resp: WireLogsResponse = serde_json::from_str(body)
        .map_err(|e| LogPulseError::MalformedResponse(format!("logs body: {e}")))?;
    resp.logs.into_iter().map(LogRecord::try_from).collect()
}

/// Decode an `/analysis_reports` response body, keeping only the first report.
pub fn parse_latest_report_body(body: &str) -> Result<Option<AnalysisReport>, LogPulseError> {
    let resp: WireReportsResponse = serde_json::from_str(body)
        .map_err(|e| LogPulseError::MalformedResponse(format!("reports body: {e}")))?;
    Ok(resp.reports.into_iter().next().map(AnalysisReport::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(Severity::classify("HIGH"), Severity::High);
        assert_eq!(Severity::classify("Medium"), Severity::Medium);
        assert_eq!(Severity::classify(" low "), Severity::Low);
    }

    #[test]
    fn test_classify_is_total() {
        for raw in ["", "critical", "unknown", "h1gh", "\u{1F525}"] {
            assert_eq!(Severity::classify(raw), Severity::Unknown, "input {raw:?}");
        }
        assert_eq!(Severity::classify_opt(None), Severity::Unknown);
    }

    #[test]
    fn test_parse_logs_body_full_record() {
        let body = r#"{"logs":[{"_id":"a1","timestamp":"2024-01-15T10:00:00Z",
            "event":{"type":"login failure","severity":"High"},
            "source":{"ip":"10.0.0.5"}}]}"#;
        let logs = parse_logs_body(body).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, "a1");
        assert_eq!(logs[0].event_type, "login failure");
        assert_eq!(logs[0].severity, Severity::High);
        assert_eq!(logs[0].source_ip, "10.0.0.5");
    }

    #[test]
    fn test_parse_logs_body_missing_nested_fields() {
        let body = r#"{"logs":[{"timestamp":"2024-01-15T10:00:00Z"}]}"#;
        let logs = parse_logs_body(body).unwrap();
        assert_eq!(logs[0].severity, Severity::Unknown);
        assert!(logs[0].event_type.is_empty());
        assert!(logs[0].source_ip.is_empty());
    }

    #[test]
    fn test_parse_logs_body_rejects_missing_logs_key() {
        let err = parse_logs_body(r#"{"items":[]}"#).unwrap_err();
        assert!(matches!(err, LogPulseError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_logs_body_rejects_bad_timestamp() {
        let body = r#"{"logs":[{"timestamp":"not a time"}]}"#;
        let err = parse_logs_body(body).unwrap_err();
        assert!(err.to_string().contains("not a time"));
    }

    #[test]
    fn test_parse_latest_report_takes_first() {
        let body = r#"{"reports":[
            {"severity":"high","suggested_actions":["block 10.0.0.5"]},
            {"severity":"low"}]}"#;
        let report = parse_latest_report_body(body).unwrap().unwrap();
        assert_eq!(report.severity, Severity::High);
        assert_eq!(report.suggested_actions, vec!["block 10.0.0.5".to_string()]);
    }

    #[test]
    fn test_parse_latest_report_empty() {
        assert!(parse_latest_report_body(r#"{"reports":[]}"#)
            .unwrap()
            .is_none());
        assert!(parse_latest_report_body("{}").unwrap().is_none());
    }
}
