//! Core data types for the Whisker inference backend.
//!
//! Everything here is plain data plus the rules that keep it consistent:
//! how a classifier output turns into a label, how a feedback record is
//! anonymized and updated, and how statistics and alerts are assembled.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod alert;
mod dashboard;
mod feedback;
mod prediction;
mod statistics;

pub use alert::{Alert, AlertField, Severity};
pub use dashboard::{DashboardData, InferencePoint, SatisfactionPoint};
pub use feedback::{
    FeedbackPolarity, FeedbackUpdate, NewPredictionFeedback, PredictionFeedback, PredictionResult,
};
pub use prediction::{
    ClassProbabilities, ConfidenceLevel, ImageSizeBucket, LOW_CONFIDENCE_THRESHOLD, Prediction,
    PredictionLabel, format_percentage,
};
pub use statistics::{ClassCounts, FeedbackCounts, FeedbackStatistics};
