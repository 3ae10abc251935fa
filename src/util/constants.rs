//! Application-wide constants for LogPulse.
//!
//! Centralising magic numbers and configuration defaults here keeps the rest
//! of the codebase clean and makes tuning straightforward.

/// Backend base URL used when no configuration overrides it.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Path of the log listing endpoint, relative to the base URL.
pub const LOGS_PATH: &str = "/logs";

/// Path of the analysis report endpoint, relative to the base URL.
pub const ANALYSIS_REPORTS_PATH: &str = "/analysis_reports";

/// Interval between poll cycles (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// Per-request timeout for backend calls (seconds). Bounds how long an
/// in-flight cycle can hold the single-flight guard.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Step (milliseconds) at which a new run re-checks the single-flight guard
/// while a previous run's cycle is still finishing.
pub const IN_FLIGHT_RETRY_MS: u64 = 10;

/// Number of metric samples retained by the rolling window.
pub const WINDOW_CAPACITY: usize = 30;

/// Size of the channel used to send monitor messages to the consumer.
/// Bounded so a stalled consumer cannot grow memory without limit; the
/// scheduler drops messages rather than blocking when it is full.
pub const CHANNEL_BOUND: usize = 64;

/// Batches larger than this get a flat anomaly score.
pub const ANOMALY_BATCH_THRESHOLD: usize = 50;

/// Anomaly score assigned to batches above [`ANOMALY_BATCH_THRESHOLD`].
pub const ANOMALY_SCORE_LARGE_BATCH: f64 = 80.0;

/// Offset added to the batch size for small batches.
pub const ANOMALY_SCORE_OFFSET: f64 = 30.0;

/// Threat levels keyed by the latest report severity.
pub const THREAT_LEVEL_HIGH: f64 = 80.0;
pub const THREAT_LEVEL_MEDIUM: f64 = 50.0;
pub const THREAT_LEVEL_LOW: f64 = 20.0;

/// Placeholder CPU gauge range, half-open `[min, max)`.
pub const CPU_USAGE_MIN: f64 = 40.0;
pub const CPU_USAGE_MAX: f64 = 70.0;

/// Placeholder attack forecast ranges, inclusive.
pub const PREDICTED_ATTACKS_HIGH: (u32, u32) = (3, 7);
pub const PREDICTED_ATTACKS_DEFAULT: (u32, u32) = (0, 1);

/// Application display name used in log output.
pub const APP_NAME: &str = "LogPulse";

/// Application version string.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variables read by [`crate::core::config::MonitorConfig::from_env`]
/// and the binary.
pub const ENV_BASE_URL: &str = "LOGPULSE_BASE_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "LOGPULSE_POLL_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "LOGPULSE_REQUEST_TIMEOUT_SECS";
pub const ENV_TOKEN: &str = "LOGPULSE_TOKEN";
pub const ENV_LOG_DIR: &str = "LOGPULSE_LOG_DIR";
pub const ENV_EXPORT_PATH: &str = "LOGPULSE_EXPORT_PATH";
pub const ENV_RUN_SECS: &str = "LOGPULSE_RUN_SECS";

/// Log file name for persistent debug logging.
pub const LOG_FILE_NAME: &str = "logpulse.log";

/// Maximum log file size in bytes before rotation (5 MB).
pub const MAX_LOG_FILE_SIZE: u64 = 5 * 1024 * 1024;
