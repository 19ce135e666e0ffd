//! Rejections of user feedback updates.

/// Why a feedback update was refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FeedbackErrorKind {
    /// No record with this id
    #[display("Feedback record {} not found", _0)]
    NotFound(i32),
    /// The uploader did not consent to data retention
    #[display("RGPD consent not granted for record {}; feedback cannot be stored", _0)]
    ConsentRequired(i32),
    /// Rating outside {0, 1}
    #[display("user_feedback must be 0 or 1, got {}", _0)]
    InvalidRating(i32),
}

/// Feedback update rejection with location tracking.
///
/// # Examples
///
/// ```
/// use whisker_error::{FeedbackError, FeedbackErrorKind};
///
/// let err = FeedbackError::new(FeedbackErrorKind::InvalidRating(7));
/// assert!(format!("{}", err).contains("must be 0 or 1"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Feedback Error: {} at line {} in {}", kind, line, file)]
pub struct FeedbackError {
    /// The error kind
    pub kind: FeedbackErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl FeedbackError {
    /// Create a new FeedbackError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FeedbackErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
