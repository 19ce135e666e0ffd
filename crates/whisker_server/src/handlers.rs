//! JSON API handlers.

use crate::{ApiError, AppState, Authorized, FeedbackForm, PredictUpload, error_message};
use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::instrument;
use whisker_core::{
    Alert, FeedbackStatistics, ImageSizeBucket, NewPredictionFeedback, PredictionFeedback,
    PredictionResult, format_percentage,
};

/// Default number of records returned by `/api/recent-predictions`.
pub const DEFAULT_RECENT_LIMIT: i64 = 10;

/// Largest accepted `limit`.
pub const MAX_RECENT_LIMIT: i64 = 1000;

/// Per-class probabilities rendered as percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbabilityStrings {
    pub cat: String,
    pub dog: String,
}

/// Body returned by `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub filename: Option<String>,
    /// "Cat" or "Dog"
    pub prediction: String,
    /// e.g. "95.34%"
    pub confidence: String,
    pub probabilities: ProbabilityStrings,
    pub inference_time_ms: i32,
    /// Id to pass to `/api/update-feedback`
    pub feedback_id: i32,
}

fn elapsed_ms(start: Instant) -> i32 {
    i32::try_from(start.elapsed().as_millis()).unwrap_or(i32::MAX)
}

/// Classify an uploaded image and record the attempt.
#[instrument(skip_all)]
pub async fn predict(
    _auth: Authorized,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PredictionResponse>, ApiError> {
    if !state.predictor().is_loaded() {
        return Err(ApiError::unavailable("Model not available"));
    }

    let upload = PredictUpload::from_multipart(multipart).await?;
    if !upload.is_image() {
        return Err(ApiError::bad_request("Invalid image format"));
    }

    let start = Instant::now();
    let prediction = match state.predictor().predict(&upload.bytes).await {
        Ok(prediction) => prediction,
        Err(err) => {
            let message = error_message(&err);
            return Err(record_failure(&state, elapsed_ms(start), message).await);
        }
    };
    let inference_time_ms = elapsed_ms(start);

    let metrics = state.metrics();
    metrics.record_inference_time(u64::try_from(inference_time_ms).unwrap_or(0));
    metrics.record_prediction_confidence(prediction.confidence_level(), *prediction.label());
    match whisker_models::inspect_image(&upload.bytes) {
        Some(info) => {
            metrics.record_image_size(ImageSizeBucket::from_dimensions(info.width, info.height))
        }
        None => tracing::debug!("Could not read image dimensions"),
    }

    let threshold = *state.config().latency_alert_threshold_ms();
    let latency = u64::try_from(inference_time_ms).unwrap_or(0);
    if latency > threshold && state.alerts().is_enabled() {
        if let Err(e) = state
            .alerts()
            .send(&Alert::high_latency(latency, threshold))
            .await
        {
            tracing::warn!(error = %e, "Failed to send latency alert");
        }
    }

    let record = NewPredictionFeedback::success(
        &prediction,
        inference_time_ms,
        upload.rgpd_consent,
        upload.filename.clone(),
    );
    let stored = match state.store().save_prediction(record).await {
        Ok(stored) => stored,
        Err(err) => {
            let message = error_message(&err);
            return Err(record_failure(&state, inference_time_ms, message).await);
        }
    };

    tracing::info!(
        feedback_id = stored.id,
        label = %prediction.label(),
        confidence = *prediction.confidence(),
        inference_time_ms,
        "Prediction served"
    );

    let probabilities = prediction.probabilities();
    Ok(Json(PredictionResponse {
        filename: upload.filename,
        prediction: prediction.label().display_name().to_string(),
        confidence: format_percentage(*prediction.confidence()),
        probabilities: ProbabilityStrings {
            cat: format_percentage(probabilities.cat),
            dog: format_percentage(probabilities.dog),
        },
        inference_time_ms,
        feedback_id: stored.id,
    }))
}

/// Store the audit record for a failed attempt and build the 500 response.
///
/// A failure to store the audit record is logged and otherwise ignored.
async fn record_failure(state: &AppState, inference_time_ms: i32, message: String) -> ApiError {
    let record = NewPredictionFeedback::failure(inference_time_ms, message.clone());
    if let Err(audit_err) = state.store().save_prediction(record).await {
        tracing::error!(error = %audit_err, "Failed to store failure record");
    }
    ApiError::internal(format!("Prediction error: {}", message))
}

/// Apply a user rating and/or comment to a stored prediction.
#[instrument(skip_all, fields(feedback_id = form.feedback_id))]
pub async fn update_feedback(
    State(state): State<AppState>,
    form: FeedbackForm,
) -> Result<StatusCode, ApiError> {
    let polarity = form.update.polarity();
    state
        .store()
        .update_feedback(form.feedback_id, form.update)
        .await?;

    if let Some(polarity) = polarity {
        state.metrics().record_feedback(polarity);
    }
    Ok(StatusCode::OK)
}

/// Aggregate statistics over all stored predictions.
#[instrument(skip_all)]
pub async fn statistics(
    State(state): State<AppState>,
) -> Result<Json<FeedbackStatistics>, ApiError> {
    let stats = state.store().statistics().await.map_err(|e| {
        ApiError::internal(format!("Failed to load statistics: {}", error_message(&e)))
    })?;
    Ok(Json(stats))
}

/// Query string of `/api/recent-predictions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<String>,
}

impl RecentQuery {
    /// Effective limit: default when absent, clamped to `0..=MAX_RECENT_LIMIT`.
    pub fn limit(&self) -> Result<i64, ApiError> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(DEFAULT_RECENT_LIMIT),
            Some(raw) => raw
                .parse::<i64>()
                .map(|limit| limit.clamp(0, MAX_RECENT_LIMIT))
                .map_err(|_| ApiError::bad_request("limit must be an integer")),
        }
    }
}

/// One entry of the recent-predictions listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPrediction {
    pub id: i32,
    /// ISO 8601
    pub timestamp: String,
    pub prediction_result: PredictionResult,
    pub proba_cat: f64,
    pub proba_dog: f64,
    pub inference_time_ms: i32,
    pub success: bool,
    pub rgpd_consent: bool,
    pub user_feedback: Option<i32>,
    pub filename: Option<String>,
}

impl From<PredictionFeedback> for RecentPrediction {
    fn from(record: PredictionFeedback) -> Self {
        let record = record.anonymized();
        Self {
            id: record.id,
            timestamp: record.timestamp.to_rfc3339(),
            prediction_result: record.prediction_result,
            proba_cat: record.proba_cat,
            proba_dog: record.proba_dog,
            inference_time_ms: record.inference_time_ms,
            success: record.success,
            rgpd_consent: record.rgpd_consent,
            user_feedback: record.user_feedback,
            filename: record.filename,
        }
    }
}

/// Body returned by `/api/recent-predictions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPredictions {
    pub predictions: Vec<RecentPrediction>,
    pub count: usize,
}

/// Most recent predictions, newest first.
#[instrument(skip_all)]
pub async fn recent_predictions(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<RecentPredictions>, ApiError> {
    let limit = query.limit()?;
    let records = state.store().recent_predictions(limit).await.map_err(|e| {
        ApiError::internal(format!("Failed to load predictions: {}", error_message(&e)))
    })?;

    let predictions: Vec<RecentPrediction> = records.into_iter().map(Into::into).collect();
    Ok(Json(RecentPredictions {
        count: predictions.len(),
        predictions,
    }))
}

/// Monitoring section of `/api/info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringInfo {
    pub prometheus_enabled: bool,
    pub discord_enabled: bool,
    pub metrics_endpoint: Option<String>,
}

/// Body returned by `/api/info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub model_loaded: bool,
    pub model_path: String,
    pub version: String,
    pub parameters: u64,
    pub features: Vec<String>,
    pub monitoring: MonitoringInfo,
}

/// Model and service metadata.
pub async fn api_info(State(state): State<AppState>) -> Json<ApiInfo> {
    let loaded = state.predictor().is_loaded();
    let metadata = state.predictor().metadata();
    let prometheus = state.metrics().is_enabled();
    let discord = state.alerts().is_enabled();

    let mut features: Vec<String> = [
        "Image classification (cats/dogs)",
        "RGPD compliance",
        "User feedback collection",
        "PostgreSQL monitoring",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    if prometheus {
        features.push("Prometheus metrics".to_string());
    }
    if discord {
        features.push("Discord alerting".to_string());
    }

    Json(ApiInfo {
        model_loaded: loaded,
        model_path: metadata.source,
        version: state.config().version().clone(),
        parameters: if loaded { metadata.parameters } else { 0 },
        features,
        monitoring: MonitoringInfo {
            prometheus_enabled: prometheus,
            discord_enabled: discord,
            metrics_endpoint: prometheus.then(|| "/metrics".to_string()),
        },
    })
}

/// Monitoring section of `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthMonitoring {
    pub prometheus: bool,
    pub discord: bool,
}

/// Body returned by `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// "healthy" or "degraded"
    pub status: String,
    pub model_loaded: bool,
    /// "connected" or "error: <message>"
    pub database: String,
    pub monitoring: HealthMonitoring,
}

/// Probe the store and report service health.
///
/// Always answers 200; a lost database only degrades the status.
#[instrument(skip_all)]
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let (database, connected) = match state.store().ping().await {
        Ok(()) => ("connected".to_string(), true),
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe failed");
            (format!("error: {}", error_message(&e)), false)
        }
    };

    if !connected && state.alerts().is_enabled() {
        if let Err(e) = state.alerts().send(&Alert::database_disconnected()).await {
            tracing::warn!(error = %e, "Failed to send database alert");
        }
    }
    state.metrics().set_database_connected(connected);

    Json(HealthReport {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        model_loaded: state.predictor().is_loaded(),
        database,
        monitoring: HealthMonitoring {
            prometheus: state.metrics().is_enabled(),
            discord: state.alerts().is_enabled(),
        },
    })
}

/// Prometheus text exposition.
pub async fn export_metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state.metrics().export()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    ))
}
