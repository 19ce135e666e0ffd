//! Classifier backends for the Whisker inference backend.
//!
//! The model is served by a separate process. [`HttpPredictor`] talks to it
//! over HTTP; [`UnavailablePredictor`] stands in when no model is configured,
//! so the service can still start and report itself as degraded.
//!
//! # Example
//!
//! ```no_run
//! use whisker_interface::Predictor;
//! use whisker_models::{HttpPredictor, ModelServerConfigBuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ModelServerConfigBuilder::default()
//!     .base_url("http://localhost:8501")
//!     .build()?;
//! let predictor = HttpPredictor::connect(config).await?;
//! if predictor.is_loaded() {
//!     let prediction = predictor.predict(&std::fs::read("cat.jpg")?).await?;
//!     println!("{}", prediction.label());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod image_info;
mod unavailable;
mod wire;

pub use client::HttpPredictor;
pub use config::{ModelServerConfig, ModelServerConfigBuilder};
pub use image_info::{ImageInfo, inspect_image};
pub use unavailable::UnavailablePredictor;
pub use wire::{MetadataResponse, PredictResponse, WireProbabilities};
