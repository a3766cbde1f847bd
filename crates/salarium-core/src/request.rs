//! Request and response types for one prediction cycle.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::schema::EncodedRecord;

/// Youngest age the service accepts.
pub const MIN_AGE: i32 = 18;

/// Smallest experience value the service accepts.
pub const MIN_EXPERIENCE: i32 = 0;

/// Age range offered by the input form. Advisory only; the service enforces
/// [`MIN_AGE`] and nothing else.
pub const AGE_FORM_RANGE: RangeInclusive<i32> = 18..=65;

/// Experience range offered by the input form. Advisory only.
pub const EXPERIENCE_FORM_RANGE: RangeInclusive<i32> = 0..=40;

/// Default model when a submission does not name one.
pub const DEFAULT_MODEL: &str = "Random Forest";

/// Raw human input, categorical fields still as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub age: i32,
    pub gender: String,
    pub education: String,
    pub job_title: String,
    pub experience: i32,
}

/// One form submission: the request plus which model to run it through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(flatten)]
    pub request: PredictionRequest,
    pub selected_model: String,
}

/// A salary estimate and the model that produced it. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Estimated salary in currency units.
    pub value: f64,
    pub model_used: String,
    /// The exact row the model saw.
    pub encoded: EncodedRecord,
}
