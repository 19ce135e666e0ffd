//! Supporting types for the capability traits.

use serde::Serialize;

/// Static description of the loaded classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelMetadata {
    /// Human-readable model name
    pub name: String,
    /// Where the model is served from (file path or server URL)
    pub source: String,
    /// Number of trainable parameters, 0 when unknown
    pub parameters: u64,
    /// Expected input size (width, height)
    pub input_size: (u32, u32),
    /// Class names in output order
    pub classes: Vec<String>,
}

impl ModelMetadata {
    /// Metadata for a model whose details are not known yet.
    pub fn unknown(source: impl Into<String>) -> Self {
        Self {
            name: "Cats vs Dogs Classifier".to_string(),
            source: source.into(),
            parameters: 0,
            input_size: (224, 224),
            classes: vec!["Cat".to_string(), "Dog".to_string()],
        }
    }

    /// Input size rendered as `WxH`.
    pub fn input_size_label(&self) -> String {
        format!("{}x{}", self.input_size.0, self.input_size.1)
    }
}
