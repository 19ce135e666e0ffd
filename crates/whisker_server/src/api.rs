//! Router construction.

use crate::{AppState, handlers, pages};
use axum::{
    Router,
    extract::{DefaultBodyLimit, MatchedPath, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use std::time::Instant;

/// Creates the application router.
///
/// `/metrics` is only mounted when the metrics sink is enabled.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(pages::index))
        .route("/info", get(pages::info))
        .route("/inference", get(pages::inference))
        .route("/monitoring", get(pages::monitoring))
        .route("/health", get(handlers::health))
        .route("/api/predict", post(handlers::predict))
        .route("/api/update-feedback", post(handlers::update_feedback))
        .route("/api/statistics", get(handlers::statistics))
        .route("/api/recent-predictions", get(handlers::recent_predictions))
        .route("/api/info", get(handlers::api_info));

    if state.metrics().is_enabled() {
        router = router.route("/metrics", get(handlers::export_metrics));
    }

    router
        .route_layer(middleware::from_fn_with_state(state.clone(), track_http))
        .layer(DefaultBodyLimit::max(*state.config().max_upload_bytes()))
        .with_state(state)
}

/// Record method, route, status and latency of every matched request.
async fn track_http(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let handler = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    state.metrics().record_http_request(
        &method,
        &handler,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}
