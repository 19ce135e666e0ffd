//! Trait definitions for the Whisker inference backend.
//!
//! Each external collaborator (the classifier, the feedback store and the two
//! monitoring sinks) sits behind a trait so request handlers only ever see the
//! capability, never the concrete backend. Disabled sinks are represented by
//! no-op implementations rather than by branches at the call sites.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{AlertSink, FeedbackStore, MetricsSink, Predictor};
pub use types::ModelMetadata;
