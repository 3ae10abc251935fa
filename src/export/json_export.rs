//! JSON export for a rolling window snapshot.
//!
//! Serialises the samples as a pretty-printed JSON array using Serde, with
//! the same camelCase field names renderers consume.

use crate::core::metrics::MetricPoint;
use crate::util::error::LogPulseError;
use std::path::Path;

/// Export the given samples to a JSON file at `path`.
///
/// # Errors
/// Returns [`LogPulseError::Export`] if the file cannot be created or written.
pub fn export_json(points: &[MetricPoint], path: &Path) -> Result<(), LogPulseError> {
    let file = std::fs::File::create(path)
        .map_err(|e| LogPulseError::Export(format!("Failed to create JSON file: {e}")))?;

    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, points)
        .map_err(|e| LogPulseError::Export(format!("Failed to write JSON: {e}")))?;

    // Explicit flush so I/O errors are not silently swallowed by BufWriter::drop.
    use std::io::Write;
    writer
        .flush()
        .map_err(|e| LogPulseError::Export(format!("Failed to flush JSON output: {e}")))?;

    tracing::info!(
        "Exported {} samples to JSON: {}",
        points.len(),
        path.display()
    );
    Ok(())
}
