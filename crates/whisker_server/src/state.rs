//! Shared application state.

use crate::ServiceConfig;
use std::sync::Arc;
use whisker_interface::{AlertSink, FeedbackStore, MetricsSink, Predictor};

/// Handles to every collaborator a request may need.
///
/// Cheap to clone; all fields are reference counted.
#[derive(Clone, derive_getters::Getters)]
pub struct AppState {
    predictor: Arc<dyn Predictor>,
    store: Arc<dyn FeedbackStore>,
    metrics: Arc<dyn MetricsSink>,
    alerts: Arc<dyn AlertSink>,
    config: Arc<ServiceConfig>,
}

impl AppState {
    /// Creates new application state.
    pub fn new(
        predictor: Arc<dyn Predictor>,
        store: Arc<dyn FeedbackStore>,
        metrics: Arc<dyn MetricsSink>,
        alerts: Arc<dyn AlertSink>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            predictor,
            store,
            metrics,
            alerts,
            config: Arc::new(config),
        }
    }
}
