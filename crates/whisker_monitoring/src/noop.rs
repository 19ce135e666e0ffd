//! Sinks that discard everything.

use async_trait::async_trait;
use tracing::debug;
use whisker_core::{Alert, ConfidenceLevel, FeedbackPolarity, ImageSizeBucket, PredictionLabel};
use whisker_error::{MetricsError, WhiskerResult};
use whisker_interface::{AlertSink, MetricsSink};

/// Metrics sink installed when Prometheus is disabled.
#[derive(Debug, Clone, Default)]
pub struct NoOpMetrics;

impl NoOpMetrics {
    /// Create a new no-op metrics sink.
    pub fn new() -> Self {
        Self
    }
}

impl MetricsSink for NoOpMetrics {
    fn is_enabled(&self) -> bool {
        false
    }

    fn record_inference_time(&self, _inference_time_ms: u64) {}

    fn record_prediction_confidence(&self, _level: ConfidenceLevel, _label: PredictionLabel) {}

    fn record_image_size(&self, _bucket: ImageSizeBucket) {}

    fn record_feedback(&self, _polarity: FeedbackPolarity) {}

    fn set_database_connected(&self, _connected: bool) {}

    fn record_http_request(&self, _method: &str, _handler: &str, _status: u16, _secs: f64) {}

    fn export(&self) -> WhiskerResult<String> {
        Err(MetricsError::new("Metrics are disabled").into())
    }
}

/// Alert sink installed when no webhook is configured.
#[derive(Debug, Clone, Default)]
pub struct NoOpAlerts;

impl NoOpAlerts {
    /// Create a new no-op alert sink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSink for NoOpAlerts {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn send(&self, alert: &Alert) -> WhiskerResult<()> {
        debug!(title = %alert.title(), "NoOpAlerts: send() called (no action taken)");
        Ok(())
    }
}
