//! Service settings shared by all handlers.

/// Settings for the HTTP service.
///
/// Built once at startup and never changed afterward.
///
/// # Examples
///
/// ```
/// use whisker_server::ServiceConfigBuilder;
///
/// let config = ServiceConfigBuilder::default()
///     .api_token("secret")
///     .build()
///     .unwrap();
/// assert_eq!(*config.latency_alert_threshold_ms(), 2000);
/// assert_eq!(*config.max_upload_bytes(), 10 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ServiceConfig {
    /// Bearer secret required by `/api/predict`
    api_token: String,
    /// Version reported by `/api/info`
    #[builder(default = "env!(\"CARGO_PKG_VERSION\").to_string()")]
    version: String,
    /// Inference slower than this raises an alert
    #[builder(default = "2000")]
    latency_alert_threshold_ms: u64,
    /// Largest accepted request body
    #[builder(default = "10 * 1024 * 1024")]
    max_upload_bytes: usize,
    /// Grafana link shown on the dashboard when metrics are enabled
    #[builder(default = "\"http://localhost:3000\".to_string()")]
    grafana_url: String,
    /// Prometheus link shown on the dashboard when metrics are enabled
    #[builder(default = "\"http://localhost:9090\".to_string()")]
    prometheus_url: String,
}

impl ServiceConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self
            .api_token
            .as_deref()
            .is_some_and(|token| token.trim().is_empty())
        {
            return Err("api_token must not be empty".to_string());
        }
        if let Some(0) = self.max_upload_bytes {
            return Err("max_upload_bytes must be positive".to_string());
        }
        if let Some(0) = self.latency_alert_threshold_ms {
            return Err("latency_alert_threshold_ms must be positive".to_string());
        }
        Ok(())
    }
}
