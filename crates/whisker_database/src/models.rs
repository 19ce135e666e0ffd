//! Diesel models for the `prediction_feedback` table.

use crate::schema::prediction_feedback;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use whisker_core::{NewPredictionFeedback, PredictionFeedback, PredictionResult};
use whisker_error::{DatabaseError, DatabaseErrorKind};

/// Database row for `prediction_feedback`.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = prediction_feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FeedbackRow {
    pub id: i32,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub prediction_result: String,
    pub proba_cat: f64,
    pub proba_dog: f64,
    pub inference_time_ms: i32,
    pub rgpd_consent: bool,
    pub filename: Option<String>,
    pub user_feedback: Option<i32>,
    pub user_comment: Option<String>,
}

/// Insertable row. Id and timestamp come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = prediction_feedback)]
pub struct NewFeedbackRow {
    pub success: bool,
    pub prediction_result: String,
    pub proba_cat: f64,
    pub proba_dog: f64,
    pub inference_time_ms: i32,
    pub rgpd_consent: bool,
    pub filename: Option<String>,
    pub user_comment: Option<String>,
}

/// User-editable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = prediction_feedback)]
#[diesel(treat_none_as_null = true)]
pub struct FeedbackChangeset {
    pub user_feedback: Option<i32>,
    pub user_comment: Option<String>,
}

impl From<NewPredictionFeedback> for NewFeedbackRow {
    fn from(record: NewPredictionFeedback) -> Self {
        Self {
            success: record.success,
            prediction_result: record.prediction_result.to_string(),
            proba_cat: record.proba_cat,
            proba_dog: record.proba_dog,
            inference_time_ms: record.inference_time_ms,
            rgpd_consent: record.rgpd_consent,
            filename: record.filename.filter(|_| record.rgpd_consent),
            user_comment: record.user_comment,
        }
    }
}

impl From<&PredictionFeedback> for FeedbackChangeset {
    fn from(record: &PredictionFeedback) -> Self {
        Self {
            user_feedback: record.user_feedback,
            user_comment: record.user_comment.clone(),
        }
    }
}

impl TryFrom<FeedbackRow> for PredictionFeedback {
    type Error = DatabaseError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        let prediction_result = row
            .prediction_result
            .parse::<PredictionResult>()
            .map_err(|_| {
                DatabaseError::new(DatabaseErrorKind::Query(format!(
                    "Unknown prediction_result '{}' in row {}",
                    row.prediction_result, row.id
                )))
            })?;

        Ok(PredictionFeedback {
            id: row.id,
            timestamp: row.timestamp,
            success: row.success,
            prediction_result,
            proba_cat: row.proba_cat,
            proba_dog: row.proba_dog,
            inference_time_ms: row.inference_time_ms,
            rgpd_consent: row.rgpd_consent,
            filename: row.filename,
            user_feedback: row.user_feedback,
            user_comment: row.user_comment,
        })
    }
}
