//! Feedback records: one per prediction attempt.

use crate::{Prediction, PredictionLabel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use whisker_error::{FeedbackError, FeedbackErrorKind};

/// Stored outcome of a prediction attempt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PredictionResult {
    /// Classified as cat
    Cat,
    /// Classified as dog
    Dog,
    /// Inference failed
    Error,
}

impl From<PredictionLabel> for PredictionResult {
    fn from(label: PredictionLabel) -> Self {
        match label {
            PredictionLabel::Cat => PredictionResult::Cat,
            PredictionLabel::Dog => PredictionResult::Dog,
        }
    }
}

/// Direction of a user rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum FeedbackPolarity {
    /// Rating of 1
    Positive,
    /// Rating of 0
    Negative,
}

impl FeedbackPolarity {
    /// Map a validated rating to its polarity. Anything but 1 is negative.
    pub fn from_rating(rating: i32) -> Self {
        if rating == 1 {
            FeedbackPolarity::Positive
        } else {
            FeedbackPolarity::Negative
        }
    }
}

/// A persisted prediction attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionFeedback {
    /// Surrogate key assigned by the store
    pub id: i32,
    /// Insert time
    pub timestamp: DateTime<Utc>,
    /// False when inference raised an error
    pub success: bool,
    /// "cat", "dog" or "error"
    pub prediction_result: PredictionResult,
    /// Cat probability in percent
    pub proba_cat: f64,
    /// Dog probability in percent
    pub proba_dog: f64,
    /// Wall-clock latency of the predict call
    pub inference_time_ms: i32,
    /// Whether the uploader agreed to data retention
    pub rgpd_consent: bool,
    /// Original filename, only kept with consent
    pub filename: Option<String>,
    /// 0 = unsatisfied, 1 = satisfied
    pub user_feedback: Option<i32>,
    /// Free text, or the error message on failure
    pub user_comment: Option<String>,
}

impl PredictionFeedback {
    /// Drop the filename unless consent was granted.
    pub fn anonymized(mut self) -> Self {
        if !self.rgpd_consent {
            self.filename = None;
        }
        self
    }

    /// Apply a user update, checking consent and the rating domain first.
    ///
    /// The record is left untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// - `ConsentRequired` if the record was stored without consent
    /// - `InvalidRating` if the rating is not 0 or 1
    #[track_caller]
    pub fn apply_update(&mut self, update: &FeedbackUpdate) -> Result<(), FeedbackError> {
        if !self.rgpd_consent {
            return Err(FeedbackError::new(FeedbackErrorKind::ConsentRequired(
                self.id,
            )));
        }
        update.validate()?;

        if let Some(rating) = update.user_feedback {
            self.user_feedback = Some(rating);
        }
        if let Some(comment) = update.comment() {
            self.user_comment = Some(comment.to_string());
        }
        Ok(())
    }
}

/// Values for a record about to be inserted.
///
/// Constructors enforce the anonymization rule: the filename is only kept
/// when consent is given.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPredictionFeedback {
    /// False when inference raised an error
    pub success: bool,
    /// "cat", "dog" or "error"
    pub prediction_result: PredictionResult,
    /// Cat probability in percent
    pub proba_cat: f64,
    /// Dog probability in percent
    pub proba_dog: f64,
    /// Wall-clock latency of the predict call
    pub inference_time_ms: i32,
    /// Whether the uploader agreed to data retention
    pub rgpd_consent: bool,
    /// Original filename, only kept with consent
    pub filename: Option<String>,
    /// Error message on failure
    pub user_comment: Option<String>,
}

impl NewPredictionFeedback {
    /// Record for a successful prediction.
    ///
    /// # Examples
    ///
    /// ```
    /// use whisker_core::{NewPredictionFeedback, Prediction};
    ///
    /// let prediction = Prediction::from_probabilities(0.9, 0.1).unwrap();
    /// let record = NewPredictionFeedback::success(&prediction, 42, false, Some("cat.jpg".into()));
    /// assert_eq!(record.filename, None);
    /// assert_eq!(record.proba_cat, 90.0);
    /// ```
    pub fn success(
        prediction: &Prediction,
        inference_time_ms: i32,
        rgpd_consent: bool,
        filename: Option<String>,
    ) -> Self {
        let (proba_cat, proba_dog) = prediction.probabilities().as_percentages();
        Self {
            success: true,
            prediction_result: (*prediction.label()).into(),
            proba_cat,
            proba_dog,
            inference_time_ms,
            rgpd_consent,
            filename: filename.filter(|_| rgpd_consent),
            user_comment: None,
        }
    }

    /// Audit record for a failed prediction. Never keeps identifying data.
    pub fn failure(inference_time_ms: i32, message: impl Into<String>) -> Self {
        Self {
            success: false,
            prediction_result: PredictionResult::Error,
            proba_cat: 0.0,
            proba_dog: 0.0,
            inference_time_ms,
            rgpd_consent: false,
            filename: None,
            user_comment: Some(message.into()),
        }
    }

    /// Materialize the record once the store has assigned id and timestamp.
    pub fn into_record(self, id: i32, timestamp: DateTime<Utc>) -> PredictionFeedback {
        PredictionFeedback {
            id,
            timestamp,
            success: self.success,
            prediction_result: self.prediction_result,
            proba_cat: self.proba_cat,
            proba_dog: self.proba_dog,
            inference_time_ms: self.inference_time_ms,
            rgpd_consent: self.rgpd_consent,
            filename: self.filename.filter(|_| self.rgpd_consent),
            user_feedback: None,
            user_comment: self.user_comment,
        }
    }
}

/// A follow-up rating and/or comment on an existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedbackUpdate {
    /// 0 = unsatisfied, 1 = satisfied
    pub user_feedback: Option<i32>,
    /// Free text comment; empty strings are ignored
    pub user_comment: Option<String>,
}

impl FeedbackUpdate {
    /// Check the rating domain.
    #[track_caller]
    pub fn validate(&self) -> Result<(), FeedbackError> {
        match self.user_feedback {
            Some(rating) if rating != 0 && rating != 1 => Err(FeedbackError::new(
                FeedbackErrorKind::InvalidRating(rating),
            )),
            _ => Ok(()),
        }
    }

    /// Comment to store, if any non-empty comment was given.
    pub fn comment(&self) -> Option<&str> {
        self.user_comment.as_deref().filter(|c| !c.is_empty())
    }

    /// True when applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.user_feedback.is_none() && self.comment().is_none()
    }

    /// Polarity of the rating carried by this update.
    pub fn polarity(&self) -> Option<FeedbackPolarity> {
        self.user_feedback.map(FeedbackPolarity::from_rating)
    }
}
