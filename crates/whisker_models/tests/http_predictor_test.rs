//! HttpPredictor against an in-process stand-in for the model server.

use axum::Router;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde_json::json;
use std::net::SocketAddr;
use whisker_core::PredictionLabel;
use whisker_error::{PredictorErrorKind, WhiskerErrorKind};
use whisker_interface::Predictor;
use whisker_models::{HttpPredictor, ModelServerConfigBuilder};

async fn spawn(router: Router) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    Ok(addr)
}

fn healthy_server(predict_body: serde_json::Value) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(
            "/metadata",
            get(|| async {
                axum::Json(json!({"name": "cnn-v2", "parameters": 1234567, "input_size": [128, 128]}))
            }),
        )
        .route(
            "/predict",
            post(move |body: Bytes| {
                let predict_body = predict_body.clone();
                async move {
                    if body.is_empty() {
                        (StatusCode::BAD_REQUEST, axum::Json(json!({"error": "empty"})))
                    } else {
                        (StatusCode::OK, axum::Json(predict_body))
                    }
                }
            }),
        )
}

async fn connect(addr: SocketAddr) -> anyhow::Result<HttpPredictor> {
    let config = ModelServerConfigBuilder::default()
        .base_url(format!("http://{}", addr))
        .build()?;
    Ok(HttpPredictor::connect(config).await?)
}

#[tokio::test]
async fn test_connect_reads_metadata_and_predicts() -> anyhow::Result<()> {
    let addr = spawn(healthy_server(
        json!({"probabilities": {"cat": 0.9534, "dog": 0.0466}, "prediction": "cat"}),
    ))
    .await?;
    let predictor = connect(addr).await?;

    assert!(predictor.is_loaded());
    let metadata = predictor.metadata();
    assert_eq!(metadata.name, "cnn-v2");
    assert_eq!(metadata.parameters, 1_234_567);
    assert_eq!(metadata.input_size_label(), "128x128");

    let prediction = predictor.predict(b"image bytes").await?;
    assert_eq!(*prediction.label(), PredictionLabel::Cat);
    assert_eq!(*prediction.confidence(), 0.9534);
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_reported() -> anyhow::Result<()> {
    let addr = spawn(healthy_server(json!({"probabilities": {"cat": 0.5, "dog": 0.5}}))).await?;
    let predictor = connect(addr).await?;

    let err = predictor.predict(b"").await.unwrap_err();
    match err.kind() {
        WhiskerErrorKind::Predictor(e) => assert!(matches!(e.kind, PredictorErrorKind::Api(_))),
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_rejected() -> anyhow::Result<()> {
    let addr = spawn(healthy_server(json!({"label": "cat"}))).await?;
    let predictor = connect(addr).await?;

    let err = predictor.predict(b"x").await.unwrap_err();
    match err.kind() {
        WhiskerErrorKind::Predictor(e) => {
            assert!(matches!(e.kind, PredictorErrorKind::Deserialization(_)))
        }
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_unhealthy_server_leaves_model_unloaded() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/health",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "loading") }),
    );
    let addr = spawn(router).await?;
    let predictor = connect(addr).await?;

    assert!(!predictor.is_loaded());
    let err = predictor.predict(b"x").await.unwrap_err();
    match err.kind() {
        WhiskerErrorKind::Predictor(e) => assert_eq!(e.kind, PredictorErrorKind::NotLoaded),
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}
