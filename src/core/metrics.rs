//! Metric derivation: one batch of log records in, one [`MetricPoint`] out.
//!
//! Derivation is pure apart from the clock and the random source used by
//! the two placeholder gauges (`cpu_usage`, `predicted_attacks`). Both are
//! injectable through [`derive_with`] so tests can pin them.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::log_record::{AnalysisReport, LogRecord, Severity};
use crate::util::constants::*;

/// Per-severity tally for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub unknown: usize,
}

impl SeverityDistribution {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.unknown
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Unknown => self.unknown,
        }
    }

    /// Element-wise sum, used when summarising a whole window.
    pub fn merge(&mut self, other: &SeverityDistribution) {
        self.low += other.low;
        self.medium += other.medium;
        self.high += other.high;
        self.unknown += other.unknown;
    }
}

/// Derived health gauges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    /// Percentage of records whose event type mentions an error or failure.
    pub error_rate: f64,
    /// Mean embedded response time over the whole batch.
    pub avg_response_time: f64,
    /// Placeholder gauge in `[40, 70)`; not real telemetry.
    pub cpu_usage: f64,
}

/// Insights derived from the latest analysis report and batch size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsights {
    pub threat_level: f64,
    pub anomaly_score: f64,
    /// Placeholder forecast; only its range is meaningful.
    pub predicted_attacks: u32,
}

/// One aggregated sample appended to the rolling window per poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPoint {
    pub captured_at: DateTime<Utc>,
    pub request_count: usize,
    pub severity_distribution: SeverityDistribution,
    pub system_health: SystemHealth,
    pub ai_insights: AiInsights,
}

/// Derive a sample using the wall clock and the thread-local RNG.
///
/// Callers skip empty batches; an empty batch still yields a well-formed
/// point with zero rates rather than NaN.
pub fn derive(batch: &[LogRecord], latest_report: Option<&AnalysisReport>) -> MetricPoint {
    derive_with(batch, latest_report, Utc::now(), &mut rand::thread_rng())
}

/// Derive a sample with an explicit capture time and random source.
pub fn derive_with<R: Rng>(
    batch: &[LogRecord],
    latest_report: Option<&AnalysisReport>,
    captured_at: DateTime<Utc>,
    rng: &mut R,
) -> MetricPoint {
    let request_count = batch.len();

    let mut severity_distribution = SeverityDistribution::default();
    let mut error_count = 0usize;
    let mut response_total = 0f64;

    for record in batch {
        severity_distribution.record(record.severity);
        if is_error_event(&record.event_type) {
            error_count += 1;
        }
        response_total += response_time(&record.event_type);
    }

    let (error_rate, avg_response_time) = if request_count == 0 {
        (0.0, 0.0)
    } else {
        (
            100.0 * error_count as f64 / request_count as f64,
            response_total / request_count as f64,
        )
    };

    let report_severity = latest_report.map(|r| r.severity);

    MetricPoint {
        captured_at,
        request_count,
        severity_distribution,
        system_health: SystemHealth {
            error_rate,
            avg_response_time,
            cpu_usage: rng.gen_range(CPU_USAGE_MIN..CPU_USAGE_MAX),
        },
        ai_insights: AiInsights {
            threat_level: threat_level(report_severity),
            anomaly_score: anomaly_score(request_count),
            predicted_attacks: predicted_attacks(report_severity, rng),
        },
    }
}

/// `true` if the event type mentions "error" or "failure", any case.
pub fn is_error_event(event_type: &str) -> bool {
    let lower = event_type.to_lowercase();
    lower.contains("error") || lower.contains("failure")
}

/// Response time embedded in an event type such as `"response 120ms"`.
///
/// Only event types containing the literal (case-sensitive) `"response"`
/// are considered; the first run of ASCII digits is the value. Anything
/// else contributes zero.
pub fn response_time(event_type: &str) -> f64 {
    static DIGITS: OnceLock<Regex> = OnceLock::new();

    if !event_type.contains("response") {
        return 0.0;
    }
    let digits = DIGITS.get_or_init(|| Regex::new("[0-9]+").expect("valid digit pattern"));
    digits
        .find(event_type)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

pub fn threat_level(report_severity: Option<Severity>) -> f64 {
    match report_severity {
        Some(Severity::High) => THREAT_LEVEL_HIGH,
        Some(Severity::Medium) => THREAT_LEVEL_MEDIUM,
        _ => THREAT_LEVEL_LOW,
    }
}

pub fn anomaly_score(request_count: usize) -> f64 {
    if request_count > ANOMALY_BATCH_THRESHOLD {
        ANOMALY_SCORE_LARGE_BATCH
    } else {
        (request_count as f64 + ANOMALY_SCORE_OFFSET).min(100.0)
    }
}

fn predicted_attacks<R: Rng>(report_severity: Option<Severity>, rng: &mut R) -> u32 {
    let (lo, hi) = if report_severity == Some(Severity::High) {
        PREDICTED_ATTACKS_HIGH
    } else {
        PREDICTED_ATTACKS_DEFAULT
    };
    rng.gen_range(lo..=hi)
}

#[cfg(test)]
pub(crate) fn test_point(request_count: usize) -> MetricPoint {
    MetricPoint {
        captured_at: Utc::now(),
        request_count,
        severity_distribution: SeverityDistribution {
            unknown: request_count,
            ..Default::default()
        },
        system_health: SystemHealth::default(),
        ai_insights: AiInsights::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(event_type: &str, severity: &str) -> LogRecord {
        LogRecord {
            id: String::new(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            event_type: event_type.into(),
            severity: Severity::classify(severity),
            source_ip: "10.0.0.1".into(),
        }
    }

    fn report(severity: Severity) -> AnalysisReport {
        AnalysisReport {
            severity,
            suggested_actions: vec![],
            summary: None,
            attack_type: None,
            analyzed_at: None,
        }
    }

    #[test]
    fn test_reference_batch() {
        let mut batch = Vec::new();
        batch.extend((0..3).map(|_| record("port scan", "high")));
        batch.extend((0..2).map(|_| record("login attempt", "medium")));
        batch.extend((0..4).map(|_| record("heartbeat", "low")));
        batch.push(record("heartbeat", ""));

        let high = report(Severity::High);
        let p = derive(&batch, Some(&high));

        assert_eq!(p.request_count, 10);
        assert_eq!(
            p.severity_distribution,
            SeverityDistribution {
                high: 3,
                medium: 2,
                low: 4,
                unknown: 1
            }
        );
        assert_eq!(p.system_health.error_rate, 0.0);
        assert_eq!(p.ai_insights.threat_level, 80.0);
        assert_eq!(p.ai_insights.anomaly_score, 40.0);
        assert!((3..=7).contains(&p.ai_insights.predicted_attacks));
    }

    #[test]
    fn test_distribution_sums_to_request_count() {
        let batch: Vec<LogRecord> = ["low", "LOW", "bogus", "High", "medium", ""]
            .iter()
            .map(|s| record("x", s))
            .collect();
        let p = derive(&batch, None);
        assert_eq!(p.severity_distribution.total(), p.request_count);
        assert_eq!(p.severity_distribution.unknown, 2);
    }

    #[test]
    fn test_error_rate_substrings() {
        let batch = vec![
            record("Auth ERROR", "low"),
            record("login Failure", "low"),
            record("ok", "low"),
            record("ok", "low"),
        ];
        let p = derive(&batch, None);
        assert_eq!(p.system_health.error_rate, 50.0);
    }

    #[test]
    fn test_response_time_average_over_full_batch() {
        let batch = vec![
            record("response 120ms", "low"),
            record("response took 80 ms (retry 2)", "low"),
            record("Response 999", "low"),
            record("login", "low"),
        ];
        let p = derive(&batch, None);
        // (120 + 80 + 0 + 0) / 4
        assert_eq!(p.system_health.avg_response_time, 50.0);
    }

    #[test]
    fn test_response_time_without_digits_is_zero() {
        assert_eq!(response_time("response pending"), 0.0);
        assert_eq!(response_time("slow response 250"), 250.0);
    }

    #[test]
    fn test_threat_levels() {
        assert_eq!(threat_level(Some(Severity::High)), 80.0);
        assert_eq!(threat_level(Some(Severity::Medium)), 50.0);
        assert_eq!(threat_level(Some(Severity::Low)), 20.0);
        assert_eq!(threat_level(None), 20.0);
    }

    #[test]
    fn test_anomaly_score_bounds() {
        assert_eq!(anomaly_score(0), 30.0);
        assert_eq!(anomaly_score(50), 80.0);
        assert_eq!(anomaly_score(51), 80.0);
        assert_eq!(anomaly_score(10_000), 80.0);
    }

    #[test]
    fn test_placeholders_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let batch = vec![record("x", "low")];
        let now = Utc::now();
        for _ in 0..200 {
            let p = derive_with(&batch, None, now, &mut rng);
            assert!(p.system_health.cpu_usage >= 40.0 && p.system_health.cpu_usage < 70.0);
            assert!(p.ai_insights.predicted_attacks <= 1);
        }
    }

    #[test]
    fn test_empty_batch_has_no_nan() {
        let p = derive(&[], None);
        assert_eq!(p.request_count, 0);
        assert_eq!(p.system_health.error_rate, 0.0);
        assert_eq!(p.system_health.avg_response_time, 0.0);
    }
}
