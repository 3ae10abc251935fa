//! Validates that compile-time constants are internally consistent.
#![allow(clippy::assertions_on_constants)]

use logpulse::util::constants::*;

#[test]
fn window_capacity_is_thirty() {
    assert_eq!(WINDOW_CAPACITY, 30, "Renderers assume a 30-sample window");
}

#[test]
fn channel_bound_is_positive() {
    assert!(CHANNEL_BOUND > 0, "CHANNEL_BOUND must be > 0");
}

#[test]
fn poll_interval_is_reasonable() {
    assert!(DEFAULT_POLL_INTERVAL_MS >= 500, "Interval too low");
    assert!(DEFAULT_POLL_INTERVAL_MS <= 60_000, "Interval too high");
}

#[test]
fn in_flight_retry_is_shorter_than_interval() {
    assert!(IN_FLIGHT_RETRY_MS > 0);
    assert!(IN_FLIGHT_RETRY_MS < DEFAULT_POLL_INTERVAL_MS);
}

#[test]
fn request_timeout_fits_inside_ten_intervals() {
    assert!(DEFAULT_REQUEST_TIMEOUT_SECS > 0);
    assert!(DEFAULT_REQUEST_TIMEOUT_SECS * 1000 <= DEFAULT_POLL_INTERVAL_MS * 10);
}

#[test]
fn placeholder_ranges_are_ordered() {
    assert!(CPU_USAGE_MIN < CPU_USAGE_MAX);
    assert!(CPU_USAGE_MAX <= 100.0);
    assert!(PREDICTED_ATTACKS_HIGH.0 <= PREDICTED_ATTACKS_HIGH.1);
    assert!(PREDICTED_ATTACKS_DEFAULT.0 <= PREDICTED_ATTACKS_DEFAULT.1);
}

#[test]
fn threat_levels_are_ordered_percentages() {
    assert!(THREAT_LEVEL_LOW < THREAT_LEVEL_MEDIUM);
    assert!(THREAT_LEVEL_MEDIUM < THREAT_LEVEL_HIGH);
    assert!(THREAT_LEVEL_HIGH <= 100.0);
}

#[test]
fn anomaly_score_never_exceeds_hundred() {
    assert!(ANOMALY_SCORE_LARGE_BATCH <= 100.0);
    assert!(ANOMALY_BATCH_THRESHOLD as f64 + ANOMALY_SCORE_OFFSET <= 100.0);
}

#[test]
fn app_metadata_is_populated() {
    assert!(!APP_NAME.is_empty(), "APP_NAME must not be empty");
    assert!(!APP_VERSION.is_empty(), "APP_VERSION must not be empty");
    assert!(DEFAULT_BASE_URL.starts_with("http"));
    assert!(LOGS_PATH.starts_with('/'));
    assert!(ANALYSIS_REPORTS_PATH.starts_with('/'));
}
