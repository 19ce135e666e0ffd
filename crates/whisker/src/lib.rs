//! Whisker service binary support.
//!
//! Command-line parsing, logging setup and construction of the services the
//! HTTP layer depends on. The `whisker` binary ties these together.
//!
//! # Cargo Features
//!
//! - `otel` - Bridge tracing spans to OpenTelemetry (stdout exporter)

#![warn(missing_docs)]

mod app;
mod cli;
pub mod observability;

pub use app::{announce_startup, build_state};
pub use cli::{Args, parse_enabled};
