//! HTTP error types.

/// Outbound HTTP failure (model server, webhooks).
///
/// `status` is set when the peer answered with a non-success status; it is
/// `None` when no response was received at all.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {}{} at line {} in {}", message, status_suffix(status), line, file)]
pub struct HttpError {
    /// What went wrong
    pub message: String,
    /// Status code returned by the peer, if any
    pub status: Option<u16>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (status {})", code)).unwrap_or_default()
}

impl HttpError {
    /// A transport-level failure: no usable response.
    ///
    /// ```
    /// use whisker_error::HttpError;
    ///
    /// let err = HttpError::new("Connection refused");
    /// assert_eq!(err.status, None);
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            status: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The peer answered, but with a non-success status.
    ///
    /// ```
    /// use whisker_error::HttpError;
    ///
    /// let err = HttpError::from_status(404, "Webhook rejected the alert");
    /// assert_eq!(err.status, Some(404));
    /// assert!(err.to_string().contains("(status 404)"));
    /// ```
    #[track_caller]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            status: Some(status),
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the peer rejected the request as malformed or unauthorized.
    pub fn is_client_error(&self) -> bool {
        self.status.is_some_and(|code| (400..500).contains(&code))
    }
}
