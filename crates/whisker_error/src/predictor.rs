//! Error types for the image classifier.

/// Error kinds for predictor operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum PredictorErrorKind {
    /// No model is loaded
    #[display("Model not loaded")]
    NotLoaded,

    /// Transport failure talking to the model server
    #[display("Model server request failed: {}", _0)]
    Http(String),

    /// Model server answered with an error status
    #[display("Model server error: {}", _0)]
    Api(String),

    /// Response could not be decoded
    #[display("Failed to deserialize model response: {}", _0)]
    Deserialization(String),

    /// Response decoded but is not a usable prediction
    #[display("Invalid prediction: {}", _0)]
    InvalidPrediction(String),
}

/// Predictor error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Predictor Error: {} at line {} in {}", kind, line, file)]
pub struct PredictorError {
    /// The error kind
    pub kind: PredictorErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl PredictorError {
    /// Create a new PredictorError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PredictorErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
