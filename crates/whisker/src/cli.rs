//! Command-line and environment configuration.

use clap::{ArgAction, Parser};
use whisker_server::{ServiceConfig, ServiceConfigBuilder, ServiceConfigBuilderError};

/// Interpret an on/off environment flag. Only `true` (any case) enables.
///
/// # Examples
///
/// ```
/// use whisker::parse_enabled;
///
/// assert_eq!(parse_enabled("TRUE"), Ok(true));
/// assert_eq!(parse_enabled("yes"), Ok(false));
/// ```
pub fn parse_enabled(value: &str) -> Result<bool, String> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

/// Cats vs dogs classification service
#[derive(Parser, Debug, Clone)]
#[command(name = "whisker")]
#[command(about = "Cats vs dogs classification service with feedback collection and monitoring", long_about = None)]
#[command(version)]
pub struct Args {
    /// PostgreSQL connection URL
    #[arg(
        long,
        env = "DATABASE_URL",
        hide_env_values = true,
        required_unless_present = "in_memory_store"
    )]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long, env = "DATABASE_POOL_SIZE", default_value_t = 10)]
    pub database_pool_size: u32,

    /// Keep feedback records in memory instead of PostgreSQL
    #[arg(long)]
    pub in_memory_store: bool,

    /// Bearer token required by the prediction endpoint
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    /// Base URL of the model server
    #[arg(long, env = "MODEL_SERVER_URL")]
    pub model_server_url: Option<String>,

    /// Bearer key sent to the model server
    #[arg(long, env = "MODEL_SERVER_API_KEY", hide_env_values = true)]
    pub model_server_api_key: Option<String>,

    /// Expose Prometheus metrics on /metrics
    #[arg(
        long,
        env = "ENABLE_PROMETHEUS",
        default_value = "false",
        value_parser = parse_enabled,
        action = ArgAction::Set
    )]
    pub enable_prometheus: bool,

    /// Discord webhook receiving alerts
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub discord_webhook_url: Option<String>,

    /// Inference latency above which an alert is sent
    #[arg(long, env = "LATENCY_ALERT_THRESHOLD_MS", default_value_t = 2000)]
    pub latency_alert_threshold_ms: u64,

    /// Largest accepted request body
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// Grafana link shown on the monitoring page
    #[arg(long, env = "GRAFANA_URL", default_value = "http://localhost:3000")]
    pub grafana_url: String,

    /// Prometheus link shown on the monitoring page
    #[arg(long, env = "PROMETHEUS_URL", default_value = "http://localhost:9090")]
    pub prometheus_url: String,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings handed to the HTTP layer.
    pub fn service_config(&self) -> Result<ServiceConfig, ServiceConfigBuilderError> {
        ServiceConfigBuilder::default()
            .api_token(self.api_token.clone())
            .latency_alert_threshold_ms(self.latency_alert_threshold_ms)
            .max_upload_bytes(self.max_upload_bytes)
            .grafana_url(self.grafana_url.clone())
            .prometheus_url(self.prometheus_url.clone())
            .build()
    }
}
