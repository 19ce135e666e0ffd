//! Monitoring sinks for the Whisker inference backend.
//!
//! Two optional sinks, each selected once at startup:
//!
//! - [`PrometheusMetrics`] collects counters and histograms and renders them
//!   in the text exposition format for `GET /metrics`.
//! - [`DiscordNotifier`] posts alerts as embeds to a Discord webhook.
//!
//! When a sink is disabled its no-op counterpart ([`NoOpMetrics`],
//! [`NoOpAlerts`]) is installed instead, so callers never branch on
//! configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod discord;
mod noop;
mod prometheus_metrics;

pub use discord::{DiscordEmbed, DiscordNotifier, EmbedField, EmbedFooter, WebhookPayload};
pub use noop::{NoOpAlerts, NoOpMetrics};
pub use prometheus_metrics::PrometheusMetrics;
