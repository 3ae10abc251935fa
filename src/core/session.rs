//! Aggregation session: the owned state behind the live metrics view.
//!
//! A session holds the [`Cursor`], the [`RollingWindow`], and the status the
//! renderer surfaces (loading flag, last error, cycle counters). A poll
//! cycle is split into two phases so a cycle can be abandoned atomically:
//!
//! 1. [`prepare_cycle`] does all network I/O and derivation without
//!    touching the session.
//! 2. [`AggregationSession::commit`] applies the result in one step.
//!
//! A cycle whose result is dropped between the two phases leaves no trace.

use chrono::{DateTime, Utc};

use crate::core::cursor::Cursor;
use crate::core::log_fetcher::LogSource;
use crate::core::metrics::{self, MetricPoint};
use crate::core::window::RollingWindow;
use crate::util::error::{LogPulseError, Result};

/// Fully computed effects of one successful, non-empty cycle.
#[derive(Debug, Clone)]
pub struct PreparedSample {
    pub point: MetricPoint,
    /// Timestamp of the last record in the batch; the next cursor value.
    pub last_timestamp: DateTime<Utc>,
}

/// What a committed cycle did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A sample was appended and the cursor advanced.
    Appended(MetricPoint),
    /// The batch was empty; nothing changed.
    Empty,
}

/// Fetch phase of a cycle: logs, then (only for a non-empty batch) the
/// latest report, then derivation. Reads no session state beyond `cursor`.
///
/// Any report fetch failure, `Unauthorized` included, degrades to `None`:
/// the batch is already in hand and only the insights fall back to the
/// low tier.
///
/// # Errors
/// Propagates the log fetch error.
pub fn prepare_cycle(
    source: &dyn LogSource,
    cursor: Option<DateTime<Utc>>,
    token: &str,
) -> Result<Option<PreparedSample>> {
    let batch = source.fetch_logs(cursor, token)?;
    let Some(last) = batch.last() else {
        tracing::debug!("Empty batch after cursor {:?}", cursor);
        return Ok(None);
    };
    let last_timestamp = last.timestamp;

    let report = match source.fetch_latest_report(token) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("Analysis report unavailable, using defaults: {}", e);
            None
        }
    };

    let point = metrics::derive(&batch, report.as_ref());
    tracing::debug!(
        "Derived sample: {} records, error rate {:.1}%, threat {}",
        point.request_count,
        point.system_health.error_rate,
        point.ai_insights.threat_level
    );

    Ok(Some(PreparedSample {
        point,
        last_timestamp,
    }))
}

/// Owned cursor, window, and surfaced status for one monitoring session.
#[derive(Debug, Clone)]
pub struct AggregationSession {
    cursor: Cursor,
    window: RollingWindow,
    loading: bool,
    last_error: Option<String>,
    cycles_completed: u64,
    cycles_failed: u64,
}

impl Default for AggregationSession {
    fn default() -> Self {
        Self::with_window(RollingWindow::new())
    }
}

impl AggregationSession {
    pub fn new(window_capacity: usize) -> Self {
        Self::with_window(RollingWindow::with_capacity(window_capacity))
    }

    fn with_window(window: RollingWindow) -> Self {
        Self {
            cursor: Cursor::new(),
            window,
            loading: true,
            last_error: None,
            cycles_completed: 0,
            cycles_failed: 0,
        }
    }

    pub fn cursor(&self) -> Option<DateTime<Utc>> {
        self.cursor.read()
    }

    /// Current window contents, oldest first.
    pub fn snapshot(&self) -> Vec<MetricPoint> {
        self.window.snapshot()
    }

    /// `true` until the first cycle has finished either way.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn cycles_failed(&self) -> u64 {
        self.cycles_failed
    }

    /// Apply the result of a successful fetch phase.
    pub fn commit(&mut self, prepared: Option<PreparedSample>) -> CycleOutcome {
        self.loading = false;
        self.last_error = None;
        self.cycles_completed += 1;

        match prepared {
            None => CycleOutcome::Empty,
            Some(PreparedSample {
                point,
                last_timestamp,
            }) => {
                self.window.append(point.clone());
                self.cursor.advance(last_timestamp);
                CycleOutcome::Appended(point)
            }
        }
    }

    /// Record a failed cycle. Cursor and window are left untouched.
    pub fn record_failure(&mut self, error: &LogPulseError) {
        self.loading = false;
        self.cycles_failed += 1;
        self.last_error = Some(error.to_string());
    }

    /// Run both phases back to back. Used where no cancellation can occur.
    ///
    /// # Errors
    /// Returns the cycle's error after recording it on the session.
    pub fn run_cycle(&mut self, source: &dyn LogSource, token: &str) -> Result<CycleOutcome> {
        match prepare_cycle(source, self.cursor(), token) {
            Ok(prepared) => Ok(self.commit(prepared)),
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }
}
