//! Tests for health, statistics, listings, metrics and pages.

mod common;

use axum::http::StatusCode;
use common::*;
use std::sync::Arc;
use whisker_database::InMemoryFeedbackStore;
use whisker_interface::{AlertSink, MetricsSink};
use whisker_monitoring::{NoOpAlerts, NoOpMetrics};
use whisker_server::{AppState, create_router};

async fn seed(app: &TestApp, count: usize) {
    for i in 0..count {
        let consent = if i % 2 == 0 { "true" } else { "false" };
        let (status, _) = send(&app.router, upload("pet.png", &png(64, 64), consent)).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_health_reports_connected_store() {
    let app = test_app(
        Arc::new(MockPredictor::returning(0.6, 0.4)),
        Arc::new(InMemoryFeedbackStore::new()),
    );

    let (status, body) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["database"], "connected");
    assert_eq!(body["monitoring"]["prometheus"], true);
    assert!(app.alerts.titles().is_empty());
    assert!(app.metrics.events().contains(&"database:true".to_string()));
}

#[tokio::test]
async fn test_health_degrades_and_alerts_when_store_is_down() {
    let app = test_app_with(
        Arc::new(MockPredictor::unloaded()),
        Arc::new(FailingStore::default()),
        config(),
    );

    let (status, body) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["model_loaded"], false);
    assert!(body["database"].as_str().unwrap().starts_with("error: "));
    assert_eq!(app.alerts.titles(), vec!["Database Connection Lost".to_string()]);
    assert!(app.metrics.events().contains(&"database:false".to_string()));
}

#[tokio::test]
async fn test_statistics_summarize_records() {
    let store = Arc::new(InMemoryFeedbackStore::new());
    let app = test_app(Arc::new(MockPredictor::returning(0.3, 0.7)), store);
    seed(&app, 4).await;

    let (status, body) = send(&app.router, get("/api/statistics")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_predictions"], 4);
    assert_eq!(body["successful_predictions"], 4);
    assert_eq!(body["failed_predictions"], 0);
    assert_eq!(body["predictions_by_class"]["dog"], 4);
    assert_eq!(body["consented_predictions"], 2);
    assert!(body["satisfaction_rate"].is_null());
}

#[tokio::test]
async fn test_statistics_fail_when_store_is_down() {
    let app = test_app_with(
        Arc::new(MockPredictor::returning(0.3, 0.7)),
        Arc::new(FailingStore::default()),
        config(),
    );

    let (status, body) = send(&app.router, get("/api/statistics")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_recent_predictions_are_newest_first() {
    let store = Arc::new(InMemoryFeedbackStore::new());
    let app = test_app(Arc::new(MockPredictor::returning(0.9, 0.1)), store);
    seed(&app, 7).await;

    let (status, body) = send(&app.router, get("/api/recent-predictions?limit=5")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    let ids: Vec<i64> = body["predictions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![7, 6, 5, 4, 3]);

    // Seeded records without consent never expose a filename.
    for prediction in body["predictions"].as_array().unwrap() {
        if prediction["rgpd_consent"] == false {
            assert!(prediction["filename"].is_null());
        }
    }

    let (status, body) = send(&app.router, get("/api/recent-predictions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 7);

    let (status, _) = send(&app.router, get("/api/recent-predictions?limit=lots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_info_lists_enabled_features() {
    let app = test_app(
        Arc::new(MockPredictor::returning(0.9, 0.1)),
        Arc::new(InMemoryFeedbackStore::new()),
    );

    let (status, body) = send(&app.router, get("/api/info")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["parameters"], 1_000_000);
    assert_eq!(body["model_path"], "http://model:8501");
    assert_eq!(body["monitoring"]["metrics_endpoint"], "/metrics");
    let features: Vec<&str> = body["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap())
        .collect();
    assert!(features.contains(&"Prometheus metrics"));
    assert!(features.contains(&"Discord alerting"));
}

#[tokio::test]
async fn test_metrics_endpoint_follows_sink() {
    let app = test_app(
        Arc::new(MockPredictor::returning(0.9, 0.1)),
        Arc::new(InMemoryFeedbackStore::new()),
    );
    let (status, body) = send_raw(&app.router, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("recorded events"));

    let metrics: Arc<dyn MetricsSink> = Arc::new(NoOpMetrics);
    let alerts: Arc<dyn AlertSink> = Arc::new(NoOpAlerts);
    let router = create_router(AppState::new(
        Arc::new(MockPredictor::returning(0.9, 0.1)),
        Arc::new(InMemoryFeedbackStore::new()),
        metrics,
        alerts,
        config(),
    ));
    let (status, _) = send_raw(&router, get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&router, get("/api/info")).await;
    assert_eq!(body["monitoring"]["prometheus_enabled"], false);
    assert!(body["monitoring"]["metrics_endpoint"].is_null());
    assert!(
        !body["features"]
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f == "Prometheus metrics")
    );
}

#[tokio::test]
async fn test_requests_are_tracked_by_route() {
    let app = test_app(
        Arc::new(MockPredictor::returning(0.9, 0.1)),
        Arc::new(InMemoryFeedbackStore::new()),
    );

    send(&app.router, get("/api/statistics")).await;
    send(&app.router, get("/api/recent-predictions?limit=abc")).await;

    let events = app.metrics.events();
    assert!(events.contains(&"http:GET /api/statistics 200".to_string()), "{events:?}");
    assert!(events.contains(&"http:GET /api/recent-predictions 400".to_string()));
}

#[tokio::test]
async fn test_pages_render() {
    let store = Arc::new(InMemoryFeedbackStore::new());
    let app = test_app(Arc::new(MockPredictor::returning(0.9, 0.1)), store);
    seed(&app, 2).await;

    for (uri, heading) in [
        ("/", "Cats vs Dogs Classifier"),
        ("/info", "Model information"),
        ("/inference", "Inference"),
        ("/monitoring", "Monitoring"),
    ] {
        let (status, body) = send_raw(&app.router, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body.contains(&format!("<h1>{heading}</h1>")), "{uri}");
    }

    let (_, body) = send_raw(&app.router, get("/monitoring")).await;
    assert!(body.contains("inference-chart"));
    assert!(body.contains("Grafana"));
}

#[tokio::test]
async fn test_monitoring_page_reports_store_failure() {
    let app = test_app_with(
        Arc::new(MockPredictor::returning(0.9, 0.1)),
        Arc::new(FailingStore::default()),
        config(),
    );

    let (status, body) = send_raw(&app.router, get("/monitoring")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Failed to load monitoring data"));
}
