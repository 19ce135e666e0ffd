//! Capability traits for the classifier, the store and the sinks.

use crate::ModelMetadata;
use async_trait::async_trait;
use whisker_core::{
    Alert, ConfidenceLevel, FeedbackPolarity, FeedbackStatistics, FeedbackUpdate, ImageSizeBucket,
    NewPredictionFeedback, PredictionFeedback, PredictionLabel, Prediction,
};
use whisker_error::WhiskerResult;

/// Image classifier.
///
/// The model itself lives outside this workspace; implementations wrap
/// whatever serves it.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Whether a model is available for inference.
    fn is_loaded(&self) -> bool;

    /// Classify raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if no model is loaded, the backend fails, or it
    /// answers with something that is not a valid prediction.
    async fn predict(&self, image: &[u8]) -> WhiskerResult<Prediction>;

    /// Description of the model for info pages.
    fn metadata(&self) -> ModelMetadata;
}

/// Persistence for prediction feedback records.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Insert a record and return it with its id and timestamp.
    async fn save_prediction(&self, record: NewPredictionFeedback)
    -> WhiskerResult<PredictionFeedback>;

    /// Fetch one record.
    async fn get(&self, id: i32) -> WhiskerResult<Option<PredictionFeedback>>;

    /// Apply a user rating and/or comment in a single transaction.
    ///
    /// # Errors
    ///
    /// - `FeedbackErrorKind::NotFound` if no record has this id
    /// - `FeedbackErrorKind::ConsentRequired` if the record lacks consent
    /// - `FeedbackErrorKind::InvalidRating` if the rating is not 0 or 1
    /// - a database error if the transaction fails (it is rolled back)
    async fn update_feedback(
        &self,
        id: i32,
        update: FeedbackUpdate,
    ) -> WhiskerResult<PredictionFeedback>;

    /// Most recent records, newest first, at most `limit`.
    async fn recent_predictions(&self, limit: i64) -> WhiskerResult<Vec<PredictionFeedback>>;

    /// Aggregate statistics over all records.
    async fn statistics(&self) -> WhiskerResult<FeedbackStatistics>;

    /// Trivial round trip proving the store is reachable.
    async fn ping(&self) -> WhiskerResult<()>;
}

/// Pull-based metrics sink.
///
/// Recording methods never fail; a disabled sink ignores every call.
pub trait MetricsSink: Send + Sync {
    /// Whether metrics are collected and exposed.
    fn is_enabled(&self) -> bool;

    /// Observe the latency of one predict call.
    fn record_inference_time(&self, inference_time_ms: u64);

    /// Count a prediction by confidence bucket and class.
    fn record_prediction_confidence(&self, level: ConfidenceLevel, label: PredictionLabel);

    /// Count an uploaded image by size bucket.
    fn record_image_size(&self, bucket: ImageSizeBucket);

    /// Count a user rating.
    fn record_feedback(&self, polarity: FeedbackPolarity);

    /// Set the database connectivity gauge.
    fn set_database_connected(&self, connected: bool);

    /// Count one HTTP request and observe its duration.
    fn record_http_request(&self, method: &str, handler: &str, status: u16, duration_secs: f64);

    /// Render all metrics in the text exposition format.
    fn export(&self) -> WhiskerResult<String>;
}

/// Push-based chat alert sink.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Whether alerts are delivered anywhere.
    fn is_enabled(&self) -> bool;

    /// Deliver one alert.
    ///
    /// Callers log failures and carry on; alert delivery must never fail
    /// the operation that triggered it.
    async fn send(&self, alert: &Alert) -> WhiskerResult<()>;
}
