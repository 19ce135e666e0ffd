//! Discord webhook implementation of [`AlertSink`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::instrument;
use whisker_core::Alert;
use whisker_error::{HttpError, WhiskerResult};
use whisker_interface::AlertSink;

const BOT_USERNAME: &str = "MLOps Bot";
const FOOTER_TEXT: &str = "CV Cats & Dogs Monitoring";

/// Body posted to a Discord webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    /// Display name of the posting bot
    pub username: String,
    /// One embed per alert
    pub embeds: Vec<DiscordEmbed>,
}

/// A Discord rich embed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordEmbed {
    /// Alert title, prefixed with a siren
    pub title: String,
    /// Alert message
    pub description: String,
    /// 24-bit RGB colour
    pub color: u32,
    /// ISO 8601 timestamp
    pub timestamp: String,
    /// Source line shown under the embed
    pub footer: EmbedFooter,
    /// Alert fields; omitted when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

/// Embed footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    /// Footer text
    pub text: String,
}

/// Embed field, always rendered inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    /// Field label
    pub name: String,
    /// Field value
    pub value: String,
    /// Always true
    pub inline: bool,
}

impl WebhookPayload {
    /// Build the payload for one alert at time `at`.
    pub fn from_alert(alert: &Alert, at: DateTime<Utc>) -> Self {
        let fields = alert
            .fields()
            .iter()
            .map(|field| EmbedField {
                name: field.name.clone(),
                value: field.value.clone(),
                inline: true,
            })
            .collect();

        Self {
            username: BOT_USERNAME.to_string(),
            embeds: vec![DiscordEmbed {
                title: format!("🚨 {}", alert.title()),
                description: alert.message().clone(),
                color: alert.severity().color(),
                timestamp: at.to_rfc3339(),
                footer: EmbedFooter {
                    text: FOOTER_TEXT.to_string(),
                },
                fields,
            }],
        }
    }
}

/// Posts alerts to a Discord webhook.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct DiscordNotifier {
    webhook_url: String,
    #[getter(skip)]
    client: reqwest::Client,
}

impl DiscordNotifier {
    /// Create a notifier for the given webhook URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            webhook_url: webhook_url.into(),
            client,
        })
    }
}

#[async_trait]
impl AlertSink for DiscordNotifier {
    fn is_enabled(&self) -> bool {
        true
    }

    #[instrument(skip(self, alert), fields(title = %alert.title(), severity = %alert.severity()))]
    async fn send(&self, alert: &Alert) -> WhiskerResult<()> {
        let payload = WebhookPayload::from_alert(alert, Utc::now());

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Webhook request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(HttpError::from_status(
                status.as_u16(),
                format!("Webhook rejected the alert: {}", status),
            )
            .into());
        }

        tracing::debug!("Alert delivered");
        Ok(())
    }
}
