//! Poll scheduler: drives fetch, derive, append on a fixed interval.
//!
//! Each run owns one background thread that executes cycles one after
//! another, so cycles never overlap within a run. Cycles are spaced
//! start-to-start; a cycle that overruns the interval is followed by the
//! next one immediately. A shared `in_flight` flag extends single-flight to
//! restarts: a tick that finds a previous run's cycle still in flight waits
//! for it in short steps, then runs.
//!
//! Cancellation uses two signals, both per run:
//! - an `AtomicBool` checked before a cycle starts and again, under the
//!   session lock, before its result is committed;
//! - a `crossbeam_channel` used as the interval timer, so `stop()` wakes
//!   a sleeping worker immediately instead of waiting out the interval.
//!
//! `stop()` sets the flag while holding the session lock. Any commit that
//! happens after `stop()` returns therefore observes the flag and discards
//! its result. An HTTP call in flight at that moment is left to finish.
//!
//! Progress is reported to the consumer as [`MonitorMessage`] values over
//! a bounded channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};

use crate::core::config::MonitorConfig;
use crate::core::log_fetcher::LogSource;
use crate::core::metrics::MetricPoint;
use crate::core::session::{prepare_cycle, AggregationSession, CycleOutcome};
use crate::util::constants::{CHANNEL_BOUND, IN_FLIGHT_RETRY_MS};
use crate::util::error::{LogPulseError, Result};
use crate::util::time::format_duration;

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Stopped,
    Running,
}

/// Messages sent from the scheduler thread to the consumer.
#[derive(Debug, Clone)]
pub enum MonitorMessage {
    /// A sample was appended; carries the full window, oldest first.
    WindowUpdated(Vec<MetricPoint>),
    /// A cycle failed transiently. Polling continues.
    CycleFailed { error: String },
    /// The backend rejected the token. Polling has stopped; the caller
    /// should clear its credentials and re-authenticate.
    Unauthorized,
    /// The worker thread has exited.
    Stopped,
}

/// Point-in-time view of the scheduler and its session, for status bars.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorStatus {
    pub state: MonitorState,
    pub loading: bool,
    pub last_error: Option<String>,
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub cursor: Option<DateTime<Utc>>,
}

/// Handles for one running worker.
struct RunHandle {
    cancel: Arc<AtomicBool>,
    /// Dropping or sending on this wakes the worker's interval wait.
    stop_tx: Sender<()>,
    _thread: std::thread::JoinHandle<()>,
}

/// Owns the aggregation session and the worker thread that feeds it.
pub struct PollScheduler {
    source: Arc<dyn LogSource>,
    token: String,
    session: Arc<Mutex<AggregationSession>>,
    in_flight: Arc<AtomicBool>,
    sender: Sender<MonitorMessage>,
    run: Option<RunHandle>,
}

impl PollScheduler {
    /// Create a stopped scheduler and the receiver for its messages.
    ///
    /// # Errors
    /// Returns [`LogPulseError::Config`] if `token` is empty or `config`
    /// fails validation.
    pub fn new(
        source: Arc<dyn LogSource>,
        token: impl Into<String>,
        config: &MonitorConfig,
    ) -> Result<(Self, Receiver<MonitorMessage>)> {
        config.validate()?;
        let token = token.into();
        if token.trim().is_empty() {
            return Err(LogPulseError::Config(
                "an auth token is required to start monitoring".into(),
            ));
        }

        let (tx, rx) = crossbeam_channel::bounded(CHANNEL_BOUND);
        let scheduler = Self {
            source,
            token,
            session: Arc::new(Mutex::new(AggregationSession::new(config.window_capacity))),
            in_flight: Arc::new(AtomicBool::new(false)),
            sender: tx,
            run: None,
        };
        Ok((scheduler, rx))
    }

    /// Transition to `Running`: run one cycle now, then one every
    /// `interval_ms`. A no-op if already running.
    pub fn start(&mut self, interval_ms: u64) {
        if self.state() == MonitorState::Running {
            tracing::debug!("start() ignored: scheduler already running");
            return;
        }
        // Release handles from a run that stopped itself (unauthorized).
        self.run = None;

        let interval = Duration::from_millis(interval_ms.max(1));
        let cancel = Arc::new(AtomicBool::new(false));
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);

        let worker = Worker {
            source: Arc::clone(&self.source),
            token: self.token.clone(),
            session: Arc::clone(&self.session),
            in_flight: Arc::clone(&self.in_flight),
            sender: self.sender.clone(),
            cancel: Arc::clone(&cancel),
        };

        let thread = std::thread::Builder::new()
            .name("poll-scheduler".into())
            .spawn(move || worker.run(interval, stop_rx))
            .expect("Failed to spawn poll scheduler thread");

        tracing::info!("Polling started (interval {})", format_duration(interval));
        self.run = Some(RunHandle {
            cancel,
            stop_tx,
            _thread: thread,
        });
    }

    /// Transition to `Stopped`. No cycle commits after this returns.
    pub fn stop(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        {
            let _guard = lock_session(&self.session);
            run.cancel.store(true, Ordering::SeqCst);
        }
        let _ = run.stop_tx.try_send(());
        tracing::info!("Polling stopped");
    }

    pub fn state(&self) -> MonitorState {
        match &self.run {
            Some(run) if !run.cancel.load(Ordering::SeqCst) => MonitorState::Running,
            _ => MonitorState::Stopped,
        }
    }

    /// Replace the token used by the next run, e.g. after re-authentication.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    /// Current window contents, oldest first.
    pub fn snapshot(&self) -> Vec<MetricPoint> {
        lock_session(&self.session).snapshot()
    }

    pub fn status(&self) -> MonitorStatus {
        let state = self.state();
        let session = lock_session(&self.session);
        MonitorStatus {
            state,
            loading: session.is_loading(),
            last_error: session.last_error().map(str::to_owned),
            cycles_completed: session.cycles_completed(),
            cycles_failed: session.cycles_failed(),
            cursor: session.cursor(),
        }
    }

    /// Shared handle to the session, for renderers that lock it directly.
    pub fn session(&self) -> Arc<Mutex<AggregationSession>> {
        Arc::clone(&self.session)
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Everything the worker thread needs, moved onto the thread.
struct Worker {
    source: Arc<dyn LogSource>,
    token: String,
    session: Arc<Mutex<AggregationSession>>,
    in_flight: Arc<AtomicBool>,
    sender: Sender<MonitorMessage>,
    cancel: Arc<AtomicBool>,
}

/// Whether the worker loop should keep ticking.
enum Tick {
    Continue,
    /// A previous run's cycle holds the guard; retry shortly.
    Busy,
    Halt,
}

impl Worker {
    fn run(self, interval: Duration, stop_rx: Receiver<()>) {
        let retry = Duration::from_millis(IN_FLIGHT_RETRY_MS);
        loop {
            if self.cancel.load(Ordering::SeqCst) {
                break;
            }
            let started = Instant::now();
            let wait = match self.tick() {
                Tick::Continue => interval.saturating_sub(started.elapsed()),
                Tick::Busy => retry,
                Tick::Halt => break,
            };
            match stop_rx.recv_timeout(wait) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("Poll scheduler thread exiting");
        self.send(MonitorMessage::Stopped);
    }

    /// One guarded cycle, or `Busy` if another run's cycle is still in flight.
    fn tick(&self) -> Tick {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::trace!("Previous cycle still in flight; waiting");
            return Tick::Busy;
        }
        let result = self.cycle();
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    fn cycle(&self) -> Tick {
        if self.cancel.load(Ordering::SeqCst) {
            return Tick::Halt;
        }

        let started = Instant::now();
        let cursor = lock_session(&self.session).cursor();
        let prepared = prepare_cycle(self.source.as_ref(), cursor, &self.token);

        let mut session = lock_session(&self.session);
        if self.cancel.load(Ordering::SeqCst) {
            tracing::debug!("Discarding cycle result: scheduler stopped mid-flight");
            return Tick::Halt;
        }

        match prepared {
            Ok(prepared) => {
                if let CycleOutcome::Appended(point) = session.commit(prepared) {
                    tracing::debug!(
                        "Cycle appended {} records in {}",
                        point.request_count,
                        format_duration(started.elapsed())
                    );
                    let snapshot = session.snapshot();
                    drop(session);
                    self.send(MonitorMessage::WindowUpdated(snapshot));
                }
                Tick::Continue
            }
            Err(LogPulseError::Unauthorized) => {
                session.record_failure(&LogPulseError::Unauthorized);
                self.cancel.store(true, Ordering::SeqCst);
                drop(session);
                tracing::error!("Session token rejected; polling stopped");
                self.send(MonitorMessage::Unauthorized);
                Tick::Halt
            }
            Err(e) => {
                session.record_failure(&e);
                drop(session);
                tracing::warn!("Poll cycle failed, retrying next tick: {}", e);
                self.send(MonitorMessage::CycleFailed {
                    error: e.to_string(),
                });
                Tick::Continue
            }
        }
    }

    fn send(&self, msg: MonitorMessage) {
        match self.sender.try_send(msg) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Monitor channel full; dropping message");
            }
        }
    }
}

/// Lock the session, recovering the data if a previous holder panicked.
fn lock_session(session: &Mutex<AggregationSession>) -> MutexGuard<'_, AggregationSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
