//! Inference service: validate → encode → predict.
//!
//! Each call is an independent transaction. Any failure aborts the whole call
//! and surfaces unchanged; there is no retry and no fallback estimate.

use salarium_core::request::{MIN_AGE, MIN_EXPERIENCE};
use salarium_core::{EncoderBundle, PredictionRequest, PredictionResult, Predictor};
use thiserror::Error;
use tracing::{debug, info};

use crate::encoding::{EncodeError, build_record};

/// Request fields below the accepted minimums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("age must be at least {min}, got {0}", min = MIN_AGE)]
    AgeBelowMinimum(i32),

    #[error("experience must be at least {min}, got {0}", min = MIN_EXPERIENCE)]
    NegativeExperience(i32),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("{model} failed to produce a prediction: {reason}")]
    ModelInvocation { model: String, reason: String },
}

/// Authoritative gate on request values. Only the two minimums are enforced.
pub fn validate(request: &PredictionRequest) -> Result<(), ValidationError> {
    if request.age < MIN_AGE {
        return Err(ValidationError::AgeBelowMinimum(request.age));
    }
    if request.experience < MIN_EXPERIENCE {
        return Err(ValidationError::NegativeExperience(request.experience));
    }
    Ok(())
}

/// Run one request through `model`.
///
/// The model is invoked exactly once on a single-row input, and only after
/// validation and encoding succeed.
pub fn predict(
    model: &dyn Predictor,
    bundle: &EncoderBundle,
    request: &PredictionRequest,
) -> Result<PredictionResult, InferenceError> {
    validate(request)?;
    let record = build_record(bundle, request)?;

    let model_used = model.kind().display_name().to_string();
    debug!(model = %model_used, ?record, "invoking model");

    let outputs = model.predict_rows(std::slice::from_ref(&record));
    let value = outputs
        .first()
        .copied()
        .ok_or_else(|| InferenceError::ModelInvocation {
            model: model_used.clone(),
            reason: "no output row".into(),
        })?;
    if !value.is_finite() {
        return Err(InferenceError::ModelInvocation {
            model: model_used,
            reason: format!("non-finite output {value}"),
        });
    }

    info!(model = %model_used, value, "prediction complete");
    Ok(PredictionResult {
        value,
        model_used,
        encoded: record,
    })
}
