//! API types exchanged with the remote metrics source and HTTP clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::core::MetricSnapshot;

/// Live performance figures reported by the remote metrics source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Observed reliability in the range 0..=1
    pub reliability_score: Option<f64>,
    pub avg_latency_ms: Option<f64>,
}

/// Full in-memory state serialized for export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub exported_at: DateTime<Utc>,
    pub current_snapshot: Option<MetricSnapshot>,
    /// Oldest first
    pub history: Vec<MetricSnapshot>,
    pub summary: ExportSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    pub total_data_points: usize,
    pub time_range: Option<TimeRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ExportDocument {
    /// Build an export from the ledger contents, oldest first
    pub fn from_history(history: Vec<MetricSnapshot>, exported_at: DateTime<Utc>) -> Self {
        let time_range = match (history.first(), history.last()) {
            (Some(first), Some(last)) => Some(TimeRange {
                start: first.timestamp,
                end: last.timestamp,
            }),
            _ => None,
        };

        Self {
            exported_at,
            current_snapshot: history.last().cloned(),
            summary: ExportSummary {
                total_data_points: history.len(),
                time_range,
            },
            history,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub ledger_size: usize,
    pub scheduler_running: bool,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_export_has_no_time_range() {
        let doc = ExportDocument::from_history(Vec::new(), Utc::now());
        assert!(doc.current_snapshot.is_none());
        assert!(doc.summary.time_range.is_none());
        assert_eq!(doc.summary.total_data_points, 0);
    }

    #[test]
    fn test_performance_summary_partial_payload() {
        let summary: PerformanceSummary =
            serde_json::from_str(r#"{"reliability_score": 0.97, "avg_latency_ms": null}"#)
                .unwrap();
        assert_eq!(summary.reliability_score, Some(0.97));
        assert!(summary.avg_latency_ms.is_none());
    }
}
