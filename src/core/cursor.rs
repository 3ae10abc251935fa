//! Cursor store: the timestamp boundary for incremental log fetches.

use chrono::{DateTime, Utc};

/// Timestamp of the most recently observed log record.
///
/// Absent until the first non-empty batch. Only ever moves forward; a
/// fresh session starts with a fresh cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    latest: Option<DateTime<Utc>>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> Option<DateTime<Utc>> {
        self.latest
    }

    /// Move the cursor to `latest` if it is strictly after the current value.
    ///
    /// Returns `true` if the cursor moved.
    pub fn advance(&mut self, latest: DateTime<Utc>) -> bool {
        match self.latest {
            Some(current) if latest <= current => {
                tracing::debug!(
                    "Cursor not advanced: {} is not after {}",
                    latest,
                    current
                );
                false
            }
            _ => {
                self.latest = Some(latest);
                true
            }
        }
    }
}
