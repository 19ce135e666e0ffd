//! HTTP service for the Whisker inference backend.
//!
//! Serves the classification API, the feedback endpoints, health and metrics,
//! and a handful of HTML pages. Handlers only see the capability traits from
//! `whisker_interface`; which backends sit behind them is decided by the
//! binary at startup.
//!
//! # Routes
//!
//! | route | purpose |
//! |---|---|
//! | `POST /api/predict` | classify an upload (bearer token required) |
//! | `POST /api/update-feedback` | rate a stored prediction |
//! | `GET /api/statistics` | aggregate statistics |
//! | `GET /api/recent-predictions` | latest records, newest first |
//! | `GET /api/info` | model and service metadata |
//! | `GET /health` | database probe |
//! | `GET /metrics` | Prometheus exposition, when enabled |
//! | `GET /`, `/info`, `/inference`, `/monitoring` | HTML pages |

#![forbid(unsafe_code)]

mod api;
mod auth;
mod config;
mod error;
mod forms;
mod handlers;
mod pages;
mod server;
mod state;

pub use api::create_router;
pub use auth::Authorized;
pub use config::{ServiceConfig, ServiceConfigBuilder, ServiceConfigBuilderError};
pub use error::{ApiError, error_message};
pub use forms::{FeedbackForm, PredictUpload, parse_consent};
pub use handlers::{
    ApiInfo, DEFAULT_RECENT_LIMIT, HealthMonitoring, HealthReport, MAX_RECENT_LIMIT,
    MonitoringInfo, PredictionResponse, ProbabilityStrings, RecentPrediction, RecentPredictions,
    RecentQuery,
};
pub use pages::escape_html;
pub use server::serve;
pub use state::AppState;
