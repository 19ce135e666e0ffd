//! Construction of the long-lived services.

use crate::Args;
use std::sync::Arc;
use tracing::{info, warn};
use whisker_core::Alert;
use whisker_database::{InMemoryFeedbackStore, PostgresFeedbackStore, create_pool};
use whisker_error::{ConfigError, WhiskerResult};
use whisker_interface::{AlertSink, FeedbackStore, MetricsSink, Predictor};
use whisker_models::{HttpPredictor, ModelServerConfigBuilder, UnavailablePredictor};
use whisker_monitoring::{DiscordNotifier, NoOpAlerts, NoOpMetrics, PrometheusMetrics};
use whisker_server::AppState;

async fn build_store(args: &Args) -> WhiskerResult<Arc<dyn FeedbackStore>> {
    if args.in_memory_store {
        warn!("Using in-memory feedback store; records are lost on restart");
        return Ok(Arc::new(InMemoryFeedbackStore::new()));
    }

    let url = args
        .database_url
        .as_deref()
        .ok_or_else(|| ConfigError::missing("DATABASE_URL"))?;
    let store = PostgresFeedbackStore::new(create_pool(url, args.database_pool_size));

    // The service still starts; /health reports the database as down.
    if let Err(e) = store.migrate().await {
        tracing::error!(error = %e, "Failed to run database migrations");
    }
    Ok(Arc::new(store))
}

async fn build_predictor(args: &Args) -> WhiskerResult<Arc<dyn Predictor>> {
    let Some(url) = args.model_server_url.as_deref() else {
        warn!("MODEL_SERVER_URL not set; predictions are unavailable");
        return Ok(Arc::new(UnavailablePredictor::new("not configured")));
    };

    let config = ModelServerConfigBuilder::default()
        .base_url(url)
        .api_key(args.model_server_api_key.clone())
        .build()
        .map_err(|e| ConfigError::new("MODEL_SERVER_URL", e.to_string()))?;
    let predictor = HttpPredictor::connect(config).await?;
    if !predictor.is_loaded() {
        warn!(url, "Model server is not ready; predictions are unavailable");
    }
    Ok(Arc::new(predictor))
}

fn build_metrics(args: &Args) -> WhiskerResult<Arc<dyn MetricsSink>> {
    if args.enable_prometheus {
        info!("Prometheus metrics enabled");
        Ok(Arc::new(PrometheusMetrics::new()?))
    } else {
        Ok(Arc::new(NoOpMetrics))
    }
}

fn build_alerts(args: &Args) -> WhiskerResult<Arc<dyn AlertSink>> {
    match args.discord_webhook_url.as_deref() {
        Some(url) if !url.trim().is_empty() => {
            info!("Discord alerts enabled");
            Ok(Arc::new(DiscordNotifier::new(url)?))
        }
        _ => Ok(Arc::new(NoOpAlerts)),
    }
}

/// Environment variable named by a service settings validation message.
fn rejected_setting(message: &str) -> &'static str {
    [
        ("api_token", "API_TOKEN"),
        ("max_upload_bytes", "MAX_UPLOAD_BYTES"),
        ("latency_alert_threshold_ms", "LATENCY_ALERT_THRESHOLD_MS"),
    ]
    .into_iter()
    .find(|(field, _)| message.contains(field))
    .map(|(_, variable)| variable)
    .unwrap_or("service settings")
}

/// Build the application state from the parsed arguments.
///
/// # Errors
///
/// Returns a configuration error for invalid settings. An unreachable
/// database or model server is not an error.
pub async fn build_state(args: &Args) -> WhiskerResult<AppState> {
    let config = args
        .service_config()
        .map_err(|e| {
            let message = e.to_string();
            ConfigError::new(rejected_setting(&message), message)
        })?;

    Ok(AppState::new(
        build_predictor(args).await?,
        build_store(args).await?,
        build_metrics(args)?,
        build_alerts(args)?,
        config,
    ))
}

/// Send the deployment notice, if alerts are enabled.
pub async fn announce_startup(state: &AppState) {
    if !state.alerts().is_enabled() {
        return;
    }
    let alert = Alert::deployment_success(state.config().version());
    if let Err(e) = state.alerts().send(&alert).await {
        warn!(error = %e, "Failed to send deployment alert");
    }
}
