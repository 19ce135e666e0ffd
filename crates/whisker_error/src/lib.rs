//! Error types for the Whisker inference backend.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use whisker_error::{ConfigError, WhiskerResult};
//!
//! fn load_token() -> WhiskerResult<String> {
//!     Err(ConfigError::missing("API_TOKEN"))?
//! }
//!
//! assert!(load_token().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod feedback;
mod http;
mod metrics;
mod predictor;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{WhiskerError, WhiskerErrorKind, WhiskerResult};
pub use feedback::{FeedbackError, FeedbackErrorKind};
pub use http::HttpError;
pub use metrics::MetricsError;
pub use predictor::{PredictorError, PredictorErrorKind};
