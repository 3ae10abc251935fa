//! Snapshot export to CSV and JSON files.

pub mod csv_export;
pub mod json_export;

use std::path::Path;

use crate::core::metrics::MetricPoint;
use crate::util::error::LogPulseError;

/// Export by file extension: `.csv` writes CSV, anything else JSON.
///
/// # Errors
/// Returns [`LogPulseError::Export`] if the directory is missing or the
/// write fails.
pub fn export_snapshot(points: &[MetricPoint], path: &Path) -> Result<(), LogPulseError> {
    csv_export::validate_export_path(path)?;
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        csv_export::export_csv(points, path)
    } else {
        json_export::export_json(points, path)
    }
}
