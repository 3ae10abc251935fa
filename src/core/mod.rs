//! Core domain modules for LogPulse.
//!
//! Contains the log data model, cursor and window state, metric derivation,
//! backend access, and the poll scheduler that ties them together.

pub mod config;
pub mod cursor;
pub mod log_fetcher;
pub mod log_record;
pub mod metrics;
pub mod scheduler;
pub mod session;
pub mod summary;
pub mod window;
