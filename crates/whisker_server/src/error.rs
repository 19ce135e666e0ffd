//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use whisker_error::{FeedbackErrorKind, PredictorErrorKind, WhiskerError, WhiskerErrorKind};

/// An error rendered as `{"detail": "..."}` with a status code.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}: {}", status, detail)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    /// Create an error with an explicit status.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// 400
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    /// 401
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    /// 503
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, detail)
    }

    /// 500
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    /// Status code of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message placed in the `detail` field.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Human-readable message for an error, without source locations.
pub fn error_message(err: &WhiskerError) -> String {
    match err.kind() {
        WhiskerErrorKind::Http(e) => e.message.clone(),
        WhiskerErrorKind::Config(e) => format!("{}: {}", e.setting, e.message),
        WhiskerErrorKind::Database(e) => e.kind.to_string(),
        WhiskerErrorKind::Feedback(e) => e.kind.to_string(),
        WhiskerErrorKind::Predictor(e) => e.kind.to_string(),
        WhiskerErrorKind::Metrics(e) => e.message.clone(),
    }
}

impl From<WhiskerError> for ApiError {
    fn from(err: WhiskerError) -> Self {
        let status = match err.kind() {
            WhiskerErrorKind::Feedback(e) => match e.kind {
                FeedbackErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
                FeedbackErrorKind::ConsentRequired(_) => StatusCode::FORBIDDEN,
                FeedbackErrorKind::InvalidRating(_) => StatusCode::BAD_REQUEST,
            },
            WhiskerErrorKind::Predictor(e) if e.kind == PredictorErrorKind::NotLoaded => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error_message(&err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, detail = %self.detail, "Request failed");
        }
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
