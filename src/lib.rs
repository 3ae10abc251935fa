//! LogPulse library crate.
//!
//! Incremental live-metrics aggregation for a security-log backend: a
//! cursor-based poller that derives one sample per batch of new records
//! and keeps the most recent samples in a bounded window for renderers.

pub mod core;
pub mod export;
pub mod util;
