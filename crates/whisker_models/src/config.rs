//! Configuration for the model server connection.

use std::time::Duration;

/// Where the model is served and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct ModelServerConfig {
    /// Base URL of the model server (e.g. "http://localhost:8501")
    base_url: String,
    /// Optional bearer token
    #[builder(default)]
    api_key: Option<String>,
    /// Per-request timeout
    #[builder(default = "Duration::from_secs(30)")]
    timeout: Duration,
}

impl ModelServerConfig {
    /// URL of an endpoint under the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}
