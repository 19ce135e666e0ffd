//! HTTP client for an external model server.

use crate::{MetadataResponse, ModelServerConfig, PredictResponse};
use async_trait::async_trait;
use tracing::instrument;
use whisker_core::{Prediction, PredictionLabel};
use whisker_error::{PredictorError, PredictorErrorKind, WhiskerResult};
use whisker_interface::{ModelMetadata, Predictor};

/// Client for a model served over HTTP.
///
/// Whether the model counts as loaded is decided once, at connect time, by
/// the server's health endpoint.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    config: ModelServerConfig,
    client: reqwest::Client,
    loaded: bool,
    metadata: ModelMetadata,
}

impl HttpPredictor {
    /// Connect to the model server, probing its health and metadata.
    ///
    /// An unreachable server is not an error: the predictor is returned in
    /// the not-loaded state.
    ///
    /// # Errors
    ///
    /// Returns an error only if the HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url()))]
    pub async fn connect(config: ModelServerConfig) -> Result<Self, PredictorError> {
        let client = reqwest::Client::builder()
            .timeout(*config.timeout())
            .build()
            .map_err(|e| {
                PredictorError::new(PredictorErrorKind::Http(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        let mut predictor = Self {
            metadata: ModelMetadata::unknown(config.base_url().clone()),
            config,
            client,
            loaded: false,
        };

        match predictor.health_check().await {
            Ok(()) => {
                predictor.loaded = true;
                tracing::info!("Model server is healthy");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Model server unavailable, predictions disabled");
                return Ok(predictor);
            }
        }

        match predictor.fetch_metadata().await {
            Ok(remote) => {
                if let Some(name) = remote.name {
                    predictor.metadata.name = name;
                }
                predictor.metadata.parameters = remote.parameters;
                predictor.metadata.input_size = remote.input_size;
            }
            Err(e) => tracing::warn!(error = %e, "Could not fetch model metadata"),
        }

        Ok(predictor)
    }

    /// Get the server configuration
    pub fn config(&self) -> &ModelServerConfig {
        &self.config
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key() {
            Some(api_key) => builder.header("Authorization", format!("Bearer {}", api_key)),
            None => builder,
        }
    }

    /// Check that the model server is up and has a model loaded.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), PredictorError> {
        let url = self.config.endpoint("health");
        tracing::debug!("Checking model server health at {}", url);

        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| {
                PredictorError::new(PredictorErrorKind::Http(format!(
                    "Health check failed: {}",
                    e
                )))
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PredictorError::new(PredictorErrorKind::Api(format!(
                "Health check returned: {}",
                response.status()
            ))))
        }
    }

    #[instrument(skip(self))]
    async fn fetch_metadata(&self) -> Result<MetadataResponse, PredictorError> {
        let url = self.config.endpoint("metadata");
        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| {
                PredictorError::new(PredictorErrorKind::Http(format!(
                    "Metadata request failed: {}",
                    e
                )))
            })?;

        if !response.status().is_success() {
            return Err(PredictorError::new(PredictorErrorKind::Api(format!(
                "Metadata returned: {}",
                response.status()
            ))));
        }

        response.json().await.map_err(|e| {
            PredictorError::new(PredictorErrorKind::Deserialization(format!(
                "Failed to parse metadata: {}",
                e
            )))
        })
    }
}

/// Turn a wire response into a validated prediction.
///
/// The label always follows the larger probability. A label reported by the
/// server that disagrees is logged and ignored.
pub(crate) fn into_prediction(response: PredictResponse) -> Result<Prediction, PredictorError> {
    let prediction =
        Prediction::from_probabilities(response.probabilities.cat, response.probabilities.dog)?;

    if let Some(reported) = response.prediction.as_deref() {
        match reported.parse::<PredictionLabel>() {
            Ok(label) if label == *prediction.label() => {}
            Ok(label) => tracing::warn!(
                reported = %label,
                derived = %prediction.label(),
                cat = response.probabilities.cat,
                dog = response.probabilities.dog,
                "Model server label disagrees with probabilities"
            ),
            Err(_) => tracing::warn!(reported, "Model server returned an unknown label"),
        }
    }

    Ok(prediction)
}

#[async_trait]
impl Predictor for HttpPredictor {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn predict(&self, image: &[u8]) -> WhiskerResult<Prediction> {
        if !self.loaded {
            return Err(PredictorError::new(PredictorErrorKind::NotLoaded).into());
        }

        let url = self.config.endpoint("predict");
        let response = self
            .request(self.client.post(&url))
            .header("Content-Type", "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Predict request failed: {}", e);
                PredictorError::new(PredictorErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Model server returned error");
            return Err(PredictorError::new(PredictorErrorKind::Api(format!(
                "Server returned {}: {}",
                status, body
            )))
            .into());
        }

        let body: PredictResponse = response.json().await.map_err(|e| {
            PredictorError::new(PredictorErrorKind::Deserialization(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        Ok(into_prediction(body)?)
    }

    fn metadata(&self) -> ModelMetadata {
        self.metadata.clone()
    }
}
