//! JSON bodies exchanged with the model server.

use serde::{Deserialize, Serialize};

/// Class probabilities as returned by `POST /predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireProbabilities {
    pub cat: f64,
    pub dog: f64,
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub probabilities: WireProbabilities,
    /// Label chosen by the server, if it reports one
    #[serde(default)]
    pub prediction: Option<String>,
}

/// Body of `GET /metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parameters: u64,
    pub input_size: (u32, u32),
}
