//! Top-level error wrapper types.

use crate::{
    ConfigError, DatabaseError, FeedbackError, HttpError, MetricsError, PredictorError,
};

/// Every error condition the workspace can surface.
///
/// # Examples
///
/// ```
/// use whisker_error::{HttpError, WhiskerError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: WhiskerError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum WhiskerErrorKind {
    /// Outbound HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Database error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Feedback update rejected
    #[from(FeedbackError)]
    Feedback(FeedbackError),
    /// Classifier error
    #[from(PredictorError)]
    Predictor(PredictorError),
    /// Metrics registry error
    #[from(MetricsError)]
    Metrics(MetricsError),
}

/// Whisker error with kind discrimination.
///
/// # Examples
///
/// ```
/// use whisker_error::{ConfigError, WhiskerResult};
///
/// fn might_fail() -> WhiskerResult<()> {
///     Err(ConfigError::missing("API_TOKEN"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Whisker Error: {}", _0)]
pub struct WhiskerError(Box<WhiskerErrorKind>);

impl WhiskerError {
    /// Create a new error from a kind.
    pub fn new(kind: WhiskerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &WhiskerErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to WhiskerErrorKind
impl<T> From<T> for WhiskerError
where
    T: Into<WhiskerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Whisker operations.
pub type WhiskerResult<T> = std::result::Result<T, WhiskerError>;
