//! Operator alerts sent to the chat sink.

use serde::Serialize;

/// Alert severity. Drives the embed colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// General information
    Info,
    /// Attention required
    Warning,
    /// Something is malfunctioning
    Error,
    /// Major incident
    Critical,
}

impl Severity {
    /// Embed colour as a 24-bit RGB integer.
    pub fn color(&self) -> u32 {
        match self {
            Severity::Info => 3_447_003,
            Severity::Warning => 16_776_960,
            Severity::Error => 15_158_332,
            Severity::Critical => 10_038_562,
        }
    }
}

/// A key/value pair shown alongside an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertField {
    /// Field label
    pub name: String,
    /// Field value
    pub value: String,
}

/// A single alert.
///
/// # Examples
///
/// ```
/// use whisker_core::{Alert, Severity};
///
/// let alert = Alert::database_disconnected();
/// assert_eq!(*alert.severity(), Severity::Critical);
/// assert_eq!(alert.fields().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, derive_getters::Getters)]
pub struct Alert {
    title: String,
    message: String,
    severity: Severity,
    fields: Vec<AlertField>,
}

impl Alert {
    /// Create an alert without fields.
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push(AlertField {
            name: name.into(),
            value: value.to_string(),
        });
        self
    }

    /// The relational store stopped answering.
    pub fn database_disconnected() -> Self {
        Self::new(
            "Database Connection Lost",
            "PostgreSQL database is unreachable. All feedback storage is currently disabled.",
            Severity::Critical,
        )
        .with_field("Service", "PostgreSQL")
        .with_field("Impact", "Feedback storage offline")
        .with_field("Action", "Check the database container logs")
    }

    /// Inference took longer than the configured threshold.
    pub fn high_latency(latency_ms: u64, threshold_ms: u64) -> Self {
        let slowdown = latency_ms as f64 / threshold_ms.max(1) as f64;
        Self::new(
            "High Inference Latency",
            format!(
                "Inference taking {}ms (threshold: {}ms)",
                latency_ms, threshold_ms
            ),
            Severity::Error,
        )
        .with_field("Latency", format!("{}ms", latency_ms))
        .with_field("Threshold", format!("{}ms", threshold_ms))
        .with_field("Slowdown", format!("x{:.1}", slowdown))
    }

    /// Alert for measured accuracy below `threshold`.
    ///
    /// Returns `None` when accuracy is at or above the threshold.
    ///
    /// ```
    /// use whisker_core::Alert;
    ///
    /// assert!(Alert::model_degradation(0.90, 0.85).is_none());
    /// assert!(Alert::model_degradation(0.80, 0.85).is_some());
    /// ```
    pub fn model_degradation(accuracy: f64, threshold: f64) -> Option<Self> {
        if accuracy >= threshold {
            return None;
        }
        let alert = Self::new(
            "Model Performance Degradation",
            format!(
                "Model accuracy ({:.2}%) dropped below threshold ({:.2}%)",
                accuracy * 100.0,
                threshold * 100.0
            ),
            Severity::Warning,
        )
        .with_field("Current Accuracy", format!("{:.2}%", accuracy * 100.0))
        .with_field("Threshold", format!("{:.2}%", threshold * 100.0))
        .with_field("Gap", format!("{:.2}%", (accuracy - threshold) * 100.0));
        Some(alert)
    }

    /// A new version started serving.
    pub fn deployment_success(version: &str) -> Self {
        Self::new(
            "Deployment Successful",
            format!("Version {} deployed successfully", version),
            Severity::Info,
        )
        .with_field("Version", version)
        .with_field("Status", "Running")
    }
}
