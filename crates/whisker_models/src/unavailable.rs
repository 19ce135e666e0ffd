//! Predictor used when no model could be loaded.

use async_trait::async_trait;
use whisker_core::Prediction;
use whisker_error::{PredictorError, PredictorErrorKind, WhiskerResult};
use whisker_interface::{ModelMetadata, Predictor};

/// Always reports "not loaded" and refuses to predict.
#[derive(Debug, Clone)]
pub struct UnavailablePredictor {
    metadata: ModelMetadata,
}

impl UnavailablePredictor {
    /// Create a placeholder for a model expected at `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            metadata: ModelMetadata::unknown(source),
        }
    }
}

#[async_trait]
impl Predictor for UnavailablePredictor {
    fn is_loaded(&self) -> bool {
        false
    }

    async fn predict(&self, _image: &[u8]) -> WhiskerResult<Prediction> {
        Err(PredictorError::new(PredictorErrorKind::NotLoaded).into())
    }

    fn metadata(&self) -> ModelMetadata {
        self.metadata.clone()
    }
}
