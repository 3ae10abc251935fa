//! Monitoring session configuration.
//!
//! Defaults come from [`crate::util::constants`]; a JSON file or the
//! `LOGPULSE_*` environment variables can override them.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::constants::*;
use crate::util::error::{LogPulseError, Result};

/// Settings for one monitoring session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Backend base URL, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Delay between the start of consecutive cycles. A cycle that overruns
    /// it is followed by the next one immediately.
    pub poll_interval_ms: u64,
    /// Timeout applied to every backend request.
    pub request_timeout_secs: u64,
    /// Rolling window size.
    pub window_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            window_capacity: WINDOW_CAPACITY,
        }
    }
}

impl MonitorConfig {
    /// Defaults overlaid with any `LOGPULSE_*` environment variables.
    ///
    /// # Errors
    /// Returns [`LogPulseError::Config`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS) {
            config.poll_interval_ms = parse_number(ENV_POLL_INTERVAL_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = parse_number(ENV_REQUEST_TIMEOUT_SECS, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| LogPulseError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(LogPulseError::Config("base_url must not be empty".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(LogPulseError::Config("poll_interval_ms must be > 0".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(LogPulseError::Config(
                "request_timeout_secs must be > 0".into(),
            ));
        }
        if self.window_capacity == 0 {
            return Err(LogPulseError::Config("window_capacity must be > 0".into()));
        }
        Ok(())
    }
}

/// Optional session time limit from `LOGPULSE_RUN_SECS`.
///
/// # Errors
/// Returns [`LogPulseError::Config`] if the variable is set but not a number.
pub fn run_limit_from_env() -> Result<Option<Duration>> {
    run_limit_from_lookup(|key| std::env::var(key).ok())
}

pub fn run_limit_from_lookup<F>(lookup: F) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(ENV_RUN_SECS)
        .map(|raw| parse_number(ENV_RUN_SECS, &raw).map(Duration::from_secs))
        .transpose()
}

fn parse_number(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| LogPulseError::Config(format!("{key}: '{raw}' is not a number")))
}
