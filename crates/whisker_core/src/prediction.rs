//! Classifier output and the buckets derived from it.

use serde::{Deserialize, Serialize};
use whisker_error::{PredictorError, PredictorErrorKind};

/// Confidence below this value is reported as low.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.55;

/// Slack allowed when checking that the two probabilities sum to one.
const PROBABILITY_SUM_TOLERANCE: f64 = 0.01;

/// Images with fewer pixels than this are small.
const SMALL_IMAGE_PIXELS: u64 = 64 * 64;

/// Images with more pixels than this are large.
const LARGE_IMAGE_PIXELS: u64 = 5000 * 5000;

/// The two classes the model distinguishes.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PredictionLabel {
    /// Cat
    Cat,
    /// Dog
    Dog,
}

impl PredictionLabel {
    /// Capitalised name shown to end users ("Cat", "Dog").
    pub fn display_name(&self) -> &'static str {
        match self {
            PredictionLabel::Cat => "Cat",
            PredictionLabel::Dog => "Dog",
        }
    }
}

/// Per-class probabilities as fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    /// Probability of the cat class
    pub cat: f64,
    /// Probability of the dog class
    pub dog: f64,
}

impl ClassProbabilities {
    /// Probabilities scaled to percentages, as stored in feedback records.
    pub fn as_percentages(&self) -> (f64, f64) {
        (self.cat * 100.0, self.dog * 100.0)
    }
}

/// A validated classifier result.
///
/// The label is always the class with the larger probability and the
/// confidence is that probability.
///
/// # Examples
///
/// ```
/// use whisker_core::{Prediction, PredictionLabel};
///
/// let prediction = Prediction::from_probabilities(0.2, 0.8).unwrap();
/// assert_eq!(*prediction.label(), PredictionLabel::Dog);
/// assert_eq!(*prediction.confidence(), 0.8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, derive_getters::Getters)]
pub struct Prediction {
    label: PredictionLabel,
    confidence: f64,
    probabilities: ClassProbabilities,
}

impl Prediction {
    /// Build a prediction from raw class probabilities.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPrediction` if a probability is not finite, lies outside
    /// `[0, 1]`, or the pair does not sum to one.
    #[track_caller]
    pub fn from_probabilities(cat: f64, dog: f64) -> Result<Self, PredictorError> {
        for (name, value) in [("cat", cat), ("dog", dog)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PredictorError::new(PredictorErrorKind::InvalidPrediction(
                    format!("{} probability {} is outside [0, 1]", name, value),
                )));
            }
        }

        if ((cat + dog) - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(PredictorError::new(PredictorErrorKind::InvalidPrediction(
                format!("probabilities sum to {} instead of 1", cat + dog),
            )));
        }

        // Ties resolve to dog.
        let (label, confidence) = if cat > dog {
            (PredictionLabel::Cat, cat)
        } else {
            (PredictionLabel::Dog, dog)
        };

        Ok(Self {
            label,
            confidence,
            probabilities: ClassProbabilities { cat, dog },
        })
    }

    /// Whether the confidence falls under [`LOW_CONFIDENCE_THRESHOLD`].
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }
}

/// Coarse confidence bucket used by the metrics sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Confidence below the threshold
    Low,
    /// Everything else
    Normal,
}

impl ConfidenceLevel {
    /// Classify a confidence value in `[0, 1]`.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence < LOW_CONFIDENCE_THRESHOLD {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::Normal
        }
    }
}

/// Image size bucket derived from pixel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ImageSizeBucket {
    /// Fewer than 64×64 pixels
    Small,
    /// Between the two thresholds
    Normal,
    /// More than 5000×5000 pixels
    Large,
}

impl ImageSizeBucket {
    /// Bucket an image by its dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use whisker_core::ImageSizeBucket;
    ///
    /// assert_eq!(ImageSizeBucket::from_dimensions(32, 32), ImageSizeBucket::Small);
    /// assert_eq!(ImageSizeBucket::from_dimensions(224, 224), ImageSizeBucket::Normal);
    /// ```
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        let pixels = u64::from(width) * u64::from(height);
        if pixels < SMALL_IMAGE_PIXELS {
            ImageSizeBucket::Small
        } else if pixels > LARGE_IMAGE_PIXELS {
            ImageSizeBucket::Large
        } else {
            ImageSizeBucket::Normal
        }
    }
}

/// Render a fraction as a percentage string with two decimals (`0.9534` → `"95.34%"`).
pub fn format_percentage(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
