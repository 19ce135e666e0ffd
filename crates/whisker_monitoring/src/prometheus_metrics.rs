//! Prometheus implementation of [`MetricsSink`].

use prometheus::{
    CounterVec, Encoder, Histogram, HistogramVec, IntGauge, Registry, TextEncoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_histogram_with_registry, register_int_gauge_with_registry,
};
use std::sync::Arc;
use tracing::instrument;
use whisker_core::{ConfidenceLevel, FeedbackPolarity, ImageSizeBucket, PredictionLabel};
use whisker_error::{MetricsError, WhiskerResult};
use whisker_interface::MetricsSink;

const INFERENCE_BUCKETS: &[f64] = &[0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0];

/// Prometheus metrics for the classification service.
///
/// Owns its own [`Registry`], so several instances can coexist in one
/// process (tests rely on this).
#[derive(Debug, Clone)]
pub struct PrometheusMetrics {
    registry: Registry,

    /// User ratings by polarity.
    user_feedback: Arc<CounterVec>,

    /// Predictions by confidence bucket and class.
    prediction_confidence: Arc<CounterVec>,

    /// Uploaded images by size bucket.
    image_size: Arc<CounterVec>,

    /// Predictor latency in seconds.
    inference_time: Arc<Histogram>,

    /// 1 when the last probe reached the database.
    database_connected: Arc<IntGauge>,

    /// Requests by method, route and status.
    http_requests: Arc<CounterVec>,

    /// Request latency by method and route.
    http_duration: Arc<HistogramVec>,
}

fn registration_error(err: prometheus::Error) -> MetricsError {
    MetricsError::new(format!("Failed to register metric: {}", err))
}

impl PrometheusMetrics {
    /// Create and register all metrics in a fresh registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric cannot be registered.
    #[instrument]
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let user_feedback = register_counter_vec_with_registry!(
            "cv_user_feedback_total",
            "Number of user feedback ratings",
            &["feedback_type"],
            registry
        )
        .map_err(registration_error)?;

        let prediction_confidence = register_counter_vec_with_registry!(
            "cv_low_confidence_predictions_total",
            "Number of predictions by confidence level",
            &["confidence_level", "prediction_result"],
            registry
        )
        .map_err(registration_error)?;

        let image_size = register_counter_vec_with_registry!(
            "cv_abnormal_image_size_total",
            "Number of uploaded images by size bucket",
            &["type"],
            registry
        )
        .map_err(registration_error)?;

        let inference_time = register_histogram_with_registry!(
            "cv_inference_time_seconds",
            "Inference time in seconds",
            INFERENCE_BUCKETS.to_vec(),
            registry
        )
        .map_err(registration_error)?;

        let database_connected = register_int_gauge_with_registry!(
            "cv_database_connected",
            "Database connection status (1=connected, 0=disconnected)",
            registry
        )
        .map_err(registration_error)?;

        let http_requests = register_counter_vec_with_registry!(
            "http_requests_total",
            "Total number of HTTP requests",
            &["method", "handler", "status"],
            registry
        )
        .map_err(registration_error)?;

        let http_duration = register_histogram_vec_with_registry!(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
            &["method", "handler"],
            registry
        )
        .map_err(registration_error)?;

        Ok(Self {
            registry,
            user_feedback: Arc::new(user_feedback),
            prediction_confidence: Arc::new(prediction_confidence),
            image_size: Arc::new(image_size),
            inference_time: Arc::new(inference_time),
            database_connected: Arc::new(database_connected),
            http_requests: Arc::new(http_requests),
            http_duration: Arc::new(http_duration),
        })
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl MetricsSink for PrometheusMetrics {
    fn is_enabled(&self) -> bool {
        true
    }

    fn record_inference_time(&self, inference_time_ms: u64) {
        self.inference_time.observe(inference_time_ms as f64 / 1000.0);
    }

    fn record_prediction_confidence(&self, level: ConfidenceLevel, label: PredictionLabel) {
        self.prediction_confidence
            .with_label_values(&[level.as_ref(), label.as_ref()])
            .inc();
    }

    fn record_image_size(&self, bucket: ImageSizeBucket) {
        self.image_size.with_label_values(&[bucket.as_ref()]).inc();
    }

    fn record_feedback(&self, polarity: FeedbackPolarity) {
        self.user_feedback.with_label_values(&[polarity.as_ref()]).inc();
    }

    fn set_database_connected(&self, connected: bool) {
        self.database_connected.set(i64::from(connected));
    }

    fn record_http_request(&self, method: &str, handler: &str, status: u16, duration_secs: f64) {
        let status = status.to_string();
        self.http_requests
            .with_label_values(&[method, handler, status.as_str()])
            .inc();
        self.http_duration
            .with_label_values(&[method, handler])
            .observe(duration_secs);
    }

    fn export(&self) -> WhiskerResult<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| MetricsError::new(format!("Failed to encode metrics: {}", e)))?;
        Ok(String::from_utf8(buffer)
            .map_err(|e| MetricsError::new(format!("Metrics are not UTF-8: {}", e)))?)
    }
}
