//! Configuration error types.

/// A setting that is missing or holds an unusable value.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {}: {} at line {} in {}", setting, message, line, file)]
pub struct ConfigError {
    /// Name of the offending setting, e.g. `DATABASE_URL`
    pub setting: String,
    /// Why the value was rejected
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Reject `setting` with a reason.
    ///
    /// ```
    /// use whisker_error::ConfigError;
    ///
    /// let err = ConfigError::new("DATABASE_URL", "required unless --in-memory-store is set");
    /// assert_eq!(err.setting, "DATABASE_URL");
    /// assert!(err.to_string().starts_with("Configuration Error: DATABASE_URL: required"));
    /// ```
    #[track_caller]
    pub fn new(setting: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            setting: setting.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// A required setting has no value.
    #[track_caller]
    pub fn missing(setting: impl Into<String>) -> Self {
        Self::new(setting, "not set")
    }
}
