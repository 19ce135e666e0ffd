//! Shared fixtures for router tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use whisker_core::{
    Alert, ConfidenceLevel, FeedbackPolarity, FeedbackStatistics, FeedbackUpdate,
    ImageSizeBucket, NewPredictionFeedback, Prediction, PredictionFeedback, PredictionLabel,
};
use whisker_database::InMemoryFeedbackStore;
use whisker_error::{
    DatabaseError, DatabaseErrorKind, PredictorError, PredictorErrorKind, WhiskerResult,
};
use whisker_interface::{AlertSink, FeedbackStore, MetricsSink, ModelMetadata, Predictor};
use whisker_server::{AppState, ServiceConfig, ServiceConfigBuilder, create_router};

pub const TOKEN: &str = "test-token";
pub const BOUNDARY: &str = "whisker-test-boundary";

/// Predictor returning fixed probabilities or a fixed error.
pub struct MockPredictor {
    loaded: bool,
    outcome: Result<(f64, f64), String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockPredictor {
    pub fn returning(cat: f64, dog: f64) -> Self {
        Self {
            loaded: true,
            outcome: Ok((cat, dog)),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            ..Self::returning(0.5, 0.5)
        }
    }

    pub fn unloaded() -> Self {
        Self {
            loaded: false,
            ..Self::returning(0.5, 0.5)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    async fn predict(&self, _image: &[u8]) -> WhiskerResult<Prediction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Ok((cat, dog)) => Ok(Prediction::from_probabilities(*cat, *dog)?),
            Err(message) => {
                Err(PredictorError::new(PredictorErrorKind::Api(message.clone())).into())
            }
        }
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            parameters: 1_000_000,
            ..ModelMetadata::unknown("http://model:8501")
        }
    }
}

/// Store whose every operation fails as if the database were down.
#[derive(Default)]
pub struct FailingStore {
    pub attempted_writes: AtomicUsize,
}

fn down() -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::Connection("connection refused".into()))
}

#[async_trait]
impl FeedbackStore for FailingStore {
    async fn save_prediction(
        &self,
        _record: NewPredictionFeedback,
    ) -> WhiskerResult<PredictionFeedback> {
        self.attempted_writes.fetch_add(1, Ordering::SeqCst);
        Err(down().into())
    }

    async fn get(&self, _id: i32) -> WhiskerResult<Option<PredictionFeedback>> {
        Err(down().into())
    }

    async fn update_feedback(
        &self,
        _id: i32,
        _update: FeedbackUpdate,
    ) -> WhiskerResult<PredictionFeedback> {
        Err(down().into())
    }

    async fn recent_predictions(&self, _limit: i64) -> WhiskerResult<Vec<PredictionFeedback>> {
        Err(down().into())
    }

    async fn statistics(&self) -> WhiskerResult<FeedbackStatistics> {
        Err(down().into())
    }

    async fn ping(&self) -> WhiskerResult<()> {
        Err(down().into())
    }
}

/// Metrics sink that remembers every call as a short string.
#[derive(Default)]
pub struct RecordingMetrics {
    events: Mutex<Vec<String>>,
}

impl RecordingMetrics {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl MetricsSink for RecordingMetrics {
    fn is_enabled(&self) -> bool {
        true
    }

    fn record_inference_time(&self, _inference_time_ms: u64) {
        self.push("inference_time".to_string());
    }

    fn record_prediction_confidence(&self, level: ConfidenceLevel, label: PredictionLabel) {
        self.push(format!("confidence:{}:{}", level, label));
    }

    fn record_image_size(&self, bucket: ImageSizeBucket) {
        self.push(format!("image_size:{}", bucket));
    }

    fn record_feedback(&self, polarity: FeedbackPolarity) {
        self.push(format!("feedback:{}", polarity));
    }

    fn set_database_connected(&self, connected: bool) {
        self.push(format!("database:{}", connected));
    }

    fn record_http_request(&self, method: &str, handler: &str, status: u16, _secs: f64) {
        self.push(format!("http:{} {} {}", method, handler, status));
    }

    fn export(&self) -> WhiskerResult<String> {
        Ok(format!("# {} recorded events\n", self.events().len()))
    }
}

/// Alert sink that keeps every alert it is given.
#[derive(Default)]
pub struct RecordingAlerts {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingAlerts {
    pub fn titles(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .map(|alert| alert.title().clone())
            .collect()
    }
}

#[async_trait]
impl AlertSink for RecordingAlerts {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, alert: &Alert) -> WhiskerResult<()> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

pub fn config() -> ServiceConfig {
    ServiceConfigBuilder::default()
        .api_token(TOKEN)
        .build()
        .unwrap()
}

/// A router wired to recording sinks, with handles to inspect them.
pub struct TestApp {
    pub router: Router,
    pub metrics: Arc<RecordingMetrics>,
    pub alerts: Arc<RecordingAlerts>,
}

pub fn test_app_with(
    predictor: Arc<dyn Predictor>,
    store: Arc<dyn FeedbackStore>,
    config: ServiceConfig,
) -> TestApp {
    let metrics = Arc::new(RecordingMetrics::default());
    let alerts = Arc::new(RecordingAlerts::default());
    let state = AppState::new(predictor, store, metrics.clone(), alerts.clone(), config);
    TestApp {
        router: create_router(state),
        metrics,
        alerts,
    }
}

pub fn test_app(predictor: Arc<dyn Predictor>, store: Arc<InMemoryFeedbackStore>) -> TestApp {
    test_app_with(predictor, store, config())
}

/// Encode a blank PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::new(width, height);
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

/// One multipart file part.
pub struct FilePart<'a> {
    pub filename: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

pub fn multipart_body(file: Option<FilePart<'_>>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn predict_request(token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::post("/api/predict").header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn upload(filename: &str, bytes: &[u8], consent: &str) -> Request<Body> {
    predict_request(
        Some(TOKEN),
        multipart_body(
            Some(FilePart {
                filename,
                content_type: "image/png",
                bytes,
            }),
            &[("rgpd_consent", consent)],
        ),
    )
}

pub fn feedback_request(form: &str) -> Request<Body> {
    Request::post("/api/update-feedback")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

/// Send a request and return the status and raw body.
pub async fn send_raw(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Send a request and parse the body as JSON (`Null` when empty).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send_raw(router, request).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap()
    };
    (status, json)
}
