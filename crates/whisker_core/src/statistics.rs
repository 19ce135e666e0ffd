//! Aggregate statistics over feedback records.

use crate::{PredictionFeedback, PredictionResult};
use serde::Serialize;

/// Raw counters, as produced by a store query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackCounts {
    /// All records
    pub total: i64,
    /// Records with `success = true`
    pub successful: i64,
    /// Successful records classified as cat
    pub cats: i64,
    /// Successful records classified as dog
    pub dogs: i64,
    /// Records stored with consent
    pub consented: i64,
    /// Records rated 1
    pub positive: i64,
    /// Records rated 0
    pub negative: i64,
    /// Sum of `inference_time_ms` over successful records
    pub successful_inference_time_ms: i64,
}

impl FeedbackCounts {
    /// Count a slice of records.
    pub fn from_records(records: &[PredictionFeedback]) -> Self {
        records.iter().fold(Self::default(), |mut counts, record| {
            counts.total += 1;
            if record.success {
                counts.successful += 1;
                counts.successful_inference_time_ms += i64::from(record.inference_time_ms);
            }
            match record.prediction_result {
                PredictionResult::Cat => counts.cats += 1,
                PredictionResult::Dog => counts.dogs += 1,
                PredictionResult::Error => {}
            }
            if record.rgpd_consent {
                counts.consented += 1;
            }
            match record.user_feedback {
                Some(1) => counts.positive += 1,
                Some(0) => counts.negative += 1,
                _ => {}
            }
            counts
        })
    }
}

/// Predictions per class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    /// Cat predictions
    pub cat: i64,
    /// Dog predictions
    pub dog: i64,
}

/// Statistics served by `/api/statistics` and the dashboard.
///
/// # Examples
///
/// ```
/// use whisker_core::{FeedbackCounts, FeedbackStatistics};
///
/// let counts = FeedbackCounts { total: 4, successful: 3, positive: 1, negative: 1, ..Default::default() };
/// let stats = FeedbackStatistics::from_counts(counts);
/// assert_eq!(stats.failed_predictions, 1);
/// assert_eq!(stats.success_rate, 75.0);
/// assert_eq!(stats.satisfaction_rate, Some(50.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackStatistics {
    /// All recorded attempts
    pub total_predictions: i64,
    /// Attempts that produced a prediction
    pub successful_predictions: i64,
    /// Attempts that failed
    pub failed_predictions: i64,
    /// Successful share in percent (0 when empty)
    pub success_rate: f64,
    /// Successful predictions per class
    pub predictions_by_class: ClassCounts,
    /// Attempts stored with consent
    pub consented_predictions: i64,
    /// Records carrying a rating
    pub feedback_count: i64,
    /// Ratings of 1
    pub positive_feedback: i64,
    /// Ratings of 0
    pub negative_feedback: i64,
    /// Positive share of rated records in percent
    pub satisfaction_rate: Option<f64>,
    /// Mean latency of successful predictions
    pub average_inference_time_ms: Option<f64>,
}

impl FeedbackStatistics {
    /// Derive rates from raw counters.
    pub fn from_counts(counts: FeedbackCounts) -> Self {
        let feedback_count = counts.positive + counts.negative;
        Self {
            total_predictions: counts.total,
            successful_predictions: counts.successful,
            failed_predictions: counts.total - counts.successful,
            success_rate: percent(counts.successful, counts.total).unwrap_or(0.0),
            predictions_by_class: ClassCounts {
                cat: counts.cats,
                dog: counts.dogs,
            },
            consented_predictions: counts.consented,
            feedback_count,
            positive_feedback: counts.positive,
            negative_feedback: counts.negative,
            satisfaction_rate: percent(counts.positive, feedback_count),
            average_inference_time_ms: (counts.successful > 0).then(|| {
                counts.successful_inference_time_ms as f64 / counts.successful as f64
            }),
        }
    }

    /// Compute statistics over a slice of records.
    pub fn from_records(records: &[PredictionFeedback]) -> Self {
        Self::from_counts(FeedbackCounts::from_records(records))
    }
}

fn percent(part: i64, whole: i64) -> Option<f64> {
    (whole > 0).then(|| part as f64 * 100.0 / whole as f64)
}
