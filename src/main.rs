//! LogPulse: headless live-metrics monitor.
//!
//! Entry point: initialises structured logging, starts a polling session
//! against the configured backend, and logs a one-line summary for every
//! window update.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing_subscriber::Layer as _;

use logpulse::core::config::{self, MonitorConfig};
use logpulse::core::log_fetcher::HttpLogSource;
use logpulse::core::scheduler::{MonitorMessage, PollScheduler};
use logpulse::core::summary::WindowSummary;
use logpulse::export::export_snapshot;
use logpulse::util::constants;
use logpulse::util::time::format_table_timestamp;

fn main() -> ExitCode {
    // Dual-layer logging: stderr (env-controlled) + file (always debug).
    let log_dir = init_log_dir();
    init_logging(&log_dir);

    tracing::info!("{} v{} starting", constants::APP_NAME, constants::APP_VERSION);
    if let Some(dir) = &log_dir {
        tracing::info!("Log file: {}", dir.join(constants::LOG_FILE_NAME).display());
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> logpulse::util::error::Result<()> {
    let config = MonitorConfig::from_env()?;
    let token = std::env::var(constants::ENV_TOKEN).unwrap_or_default();
    let run_for = config::run_limit_from_env()?;
    let export_path = std::env::var_os(constants::ENV_EXPORT_PATH).map(PathBuf::from);

    let source = Arc::new(HttpLogSource::new(&config)?);
    let (mut scheduler, rx) = PollScheduler::new(source, token, &config)?;

    tracing::info!("Monitoring {}", config.base_url);
    scheduler.start(config.poll_interval_ms);

    let started = Instant::now();
    loop {
        let wait = match run_for {
            Some(limit) => match limit.checked_sub(started.elapsed()) {
                Some(left) => left,
                None => break,
            },
            None => Duration::from_secs(3600),
        };

        match rx.recv_timeout(wait) {
            Ok(MonitorMessage::WindowUpdated(points)) => {
                let summary = WindowSummary::from_points(&points);
                let latest = points.last();
                tracing::info!(
                    "[{}] +{} records | window {} samples, {} total | threat {:.0} | peak anomaly {:.0} | mean error rate {:.1}%",
                    latest
                        .map(|p| format_table_timestamp(&p.captured_at))
                        .unwrap_or_default(),
                    latest.map(|p| p.request_count).unwrap_or(0),
                    summary.samples,
                    summary.total_requests,
                    summary.latest_threat_level.unwrap_or(0.0),
                    summary.peak_anomaly_score.unwrap_or(0.0),
                    summary.mean_error_rate,
                );
            }
            Ok(MonitorMessage::CycleFailed { error }) => {
                tracing::warn!("Cycle failed: {}", error);
            }
            Ok(MonitorMessage::Unauthorized) => {
                tracing::error!("Token rejected; re-authenticate and restart");
                break;
            }
            Ok(MonitorMessage::Stopped) => break,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                if run_for.is_some() {
                    break;
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
    }

    scheduler.stop();

    if let Some(path) = export_path {
        export_snapshot(&scheduler.snapshot(), &path)?;
    }

    let status = scheduler.status();
    tracing::info!(
        "Session ended: {} cycles ok, {} failed",
        status.cycles_completed,
        status.cycles_failed
    );
    Ok(())
}

/// Create the persistent log directory named by `LOGPULSE_LOG_DIR`.
///
/// Returns `Some(path)` on success, `None` if unset or the directory cannot
/// be created (logging falls back to stderr only).
fn init_log_dir() -> Option<PathBuf> {
    let log_dir = PathBuf::from(std::env::var_os(constants::ENV_LOG_DIR)?);
    std::fs::create_dir_all(&log_dir).ok()?;

    // Rotate the log file if it exceeds the size limit.
    let log_file = log_dir.join(constants::LOG_FILE_NAME);
    if let Ok(meta) = std::fs::metadata(&log_file) {
        if meta.len() > constants::MAX_LOG_FILE_SIZE {
            let backup = log_dir.join("logpulse.log.old");
            let _ = std::fs::rename(&log_file, &backup);
        }
    }

    Some(log_dir)
}

/// Initialise the dual-layer tracing subscriber.
///
/// - **stderr layer**: filtered by `RUST_LOG` env var (default: `info`).
/// - **file layer** (if `log_dir` is `Some`): always writes at `debug` level.
fn init_logging(log_dir: &Option<PathBuf>) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    if let Some(dir) = log_dir {
        let log_path = dir.join(constants::LOG_FILE_NAME);
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .with_filter(tracing_subscriber::EnvFilter::new("debug"));

            tracing_subscriber::registry()
                .with(stderr_layer.with_filter(env_filter))
                .with(file_layer)
                .init();
            return;
        }
    }

    // Fallback: stderr only
    tracing_subscriber::registry()
        .with(stderr_layer.with_filter(env_filter))
        .init();
}
