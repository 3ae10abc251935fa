//! KPI summary over a window snapshot.
//!
//! Computed on demand from [`MetricPoint`]s; never cached, since the window
//! is at most a few dozen samples.

use crate::core::metrics::{MetricPoint, SeverityDistribution};

/// Aggregate figures for the KPI cards above the live charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowSummary {
    /// Number of samples in the window.
    pub samples: usize,
    /// Sum of `request_count` across all samples.
    pub total_requests: usize,
    /// Threat level of the most recent sample.
    pub latest_threat_level: Option<f64>,
    /// Highest anomaly score seen in the window.
    pub peak_anomaly_score: Option<f64>,
    /// Unweighted mean of per-sample error rates.
    pub mean_error_rate: f64,
    /// Unweighted mean of per-sample average response times.
    pub mean_response_time: f64,
    /// Severity counts summed across samples.
    pub severity_totals: SeverityDistribution,
}

impl WindowSummary {
    pub fn from_points(points: &[MetricPoint]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let mut severity_totals = SeverityDistribution::default();
        let mut total_requests = 0usize;
        let mut error_sum = 0f64;
        let mut response_sum = 0f64;
        let mut peak: f64 = f64::MIN;

        for p in points {
            severity_totals.merge(&p.severity_distribution);
            total_requests += p.request_count;
            error_sum += p.system_health.error_rate;
            response_sum += p.system_health.avg_response_time;
            peak = peak.max(p.ai_insights.anomaly_score);
        }

        let n = points.len() as f64;
        WindowSummary {
            samples: points.len(),
            total_requests,
            latest_threat_level: points.last().map(|p| p.ai_insights.threat_level),
            peak_anomaly_score: Some(peak),
            mean_error_rate: error_sum / n,
            mean_response_time: response_sum / n,
            severity_totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::test_point;

    #[test]
    fn test_empty_window() {
        let s = WindowSummary::from_points(&[]);
        assert_eq!(s.samples, 0);
        assert_eq!(s.latest_threat_level, None);
        assert_eq!(s.peak_anomaly_score, None);
    }

    #[test]
    fn test_totals_and_means() {
        let mut a = test_point(4);
        a.system_health.error_rate = 50.0;
        a.ai_insights.anomaly_score = 34.0;
        a.ai_insights.threat_level = 20.0;
        let mut b = test_point(6);
        b.system_health.error_rate = 0.0;
        b.ai_insights.anomaly_score = 36.0;
        b.ai_insights.threat_level = 80.0;

        let s = WindowSummary::from_points(&[a, b]);
        assert_eq!(s.samples, 2);
        assert_eq!(s.total_requests, 10);
        assert_eq!(s.severity_totals.total(), 10);
        assert_eq!(s.mean_error_rate, 25.0);
        assert_eq!(s.peak_anomaly_score, Some(36.0));
        assert_eq!(s.latest_threat_level, Some(80.0));
    }
}
