//! Timestamp parsing and formatting helpers for LogPulse.
//!
//! The backend is not strict about timestamp formats, so parsing accepts the
//! handful of shapes it is known to emit. Formatting for the `start` query
//! parameter keeps full sub-second precision so the server-side "strictly
//! after" filter never re-delivers the cursor record.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, Utc};

/// Parse a timestamp as emitted by the backend.
///
/// Accepts:
/// - RFC 3339 (`2024-01-15T10:23:45.123Z`, `2024-01-15T10:23:45+02:00`)
/// - RFC 2822 (`Mon, 15 Jan 2024 10:23:45 GMT`)
/// - naive ISO 8601 (`2024-01-15T10:23:45.123456` or with a space separator),
///   interpreted as UTC
pub fn parse_wire_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(naive.and_utc());
        }
    }

    None
}

/// Format a cursor instant for the `start` query parameter.
pub fn format_cursor(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Format a UTC timestamp in local time, `YYYY-MM-DD HH:MM:SS`.
///
/// Used for log lines and CSV export where a compact form reads best.
pub fn format_table_timestamp(ts: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = ts.with_timezone(&Local);
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a `std::time::Duration` into a human-readable string.
///
/// Examples: `4.0ms`, `1.2s`, `1.5m`.
pub fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.01 {
        format!("{:.1}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = secs / 60.0;
        format!("{mins:.1}m")
    }
}
