//! Data behind the monitoring dashboard.

use crate::{FeedbackStatistics, PredictionFeedback};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Latency of one successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferencePoint {
    /// When the prediction was stored
    pub timestamp: DateTime<Utc>,
    /// Measured latency
    pub inference_time_ms: i32,
}

/// One user rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionPoint {
    /// When the prediction was stored
    pub timestamp: DateTime<Utc>,
    /// 0 or 1
    pub user_feedback: i32,
}

/// KPIs and time series for the dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    /// Aggregates over all records
    pub statistics: FeedbackStatistics,
    /// Latency series, oldest first
    pub inference_series: Vec<InferencePoint>,
    /// Rating series, oldest first
    pub satisfaction_series: Vec<SatisfactionPoint>,
}

impl DashboardData {
    /// Build dashboard data from statistics and a newest-first slice of records.
    pub fn new(statistics: FeedbackStatistics, recent: &[PredictionFeedback]) -> Self {
        let inference_series = recent
            .iter()
            .rev()
            .filter(|record| record.success)
            .map(|record| InferencePoint {
                timestamp: record.timestamp,
                inference_time_ms: record.inference_time_ms,
            })
            .collect();

        let satisfaction_series = recent
            .iter()
            .rev()
            .filter_map(|record| {
                record.user_feedback.map(|user_feedback| SatisfactionPoint {
                    timestamp: record.timestamp,
                    user_feedback,
                })
            })
            .collect();

        Self {
            statistics,
            inference_series,
            satisfaction_series,
        }
    }
}
