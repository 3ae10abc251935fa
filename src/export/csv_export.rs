//! CSV export for a rolling window snapshot.
//!
//! One row per sample, with the nested gauges flattened into columns.

use crate::core::log_record::Severity;
use crate::core::metrics::MetricPoint;
use crate::util::error::LogPulseError;
use crate::util::time::format_cursor;
use std::path::Path;

const HEADER: [&str; 12] = [
    "CapturedAt",
    "Requests",
    "Low",
    "Medium",
    "High",
    "Unknown",
    "ErrorRate",
    "AvgResponseTime",
    "CpuUsage",
    "ThreatLevel",
    "AnomalyScore",
    "PredictedAttacks",
];

/// Export the given samples to a CSV file at `path`.
///
/// # Errors
/// Returns [`LogPulseError::Export`] if the file cannot be created or written.
pub fn export_csv(points: &[MetricPoint], path: &Path) -> Result<(), LogPulseError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| LogPulseError::Export(format!("Failed to create CSV file: {e}")))?;

    writer
        .write_record(HEADER)
        .map_err(|e| LogPulseError::Export(format!("Failed to write CSV header: {e}")))?;

    for point in points {
        writer
            .write_record(csv_row(point))
            .map_err(|e| LogPulseError::Export(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| LogPulseError::Export(format!("Failed to flush CSV: {e}")))?;

    tracing::info!(
        "Exported {} samples to CSV: {}",
        points.len(),
        path.display()
    );
    Ok(())
}

fn csv_row(point: &MetricPoint) -> Vec<String> {
    let dist = &point.severity_distribution;
    let health = &point.system_health;
    let ai = &point.ai_insights;
    vec![
        format_cursor(&point.captured_at),
        point.request_count.to_string(),
        dist.get(Severity::Low).to_string(),
        dist.get(Severity::Medium).to_string(),
        dist.get(Severity::High).to_string(),
        dist.get(Severity::Unknown).to_string(),
        format!("{:.2}", health.error_rate),
        format!("{:.2}", health.avg_response_time),
        format!("{:.2}", health.cpu_usage),
        format!("{:.0}", ai.threat_level),
        format!("{:.0}", ai.anomaly_score),
        ai.predicted_attacks.to_string(),
    ]
}

/// Check that `path`'s parent directory exists before a long export.
///
/// # Errors
/// Returns [`LogPulseError::Export`] naming the missing directory.
pub fn validate_export_path(path: &Path) -> Result<(), LogPulseError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    if !parent.is_dir() {
        return Err(LogPulseError::Export(format!(
            "Export directory does not exist: {}",
            parent.display()
        )));
    }
    Ok(())
}
