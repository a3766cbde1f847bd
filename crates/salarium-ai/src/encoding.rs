//! Encoding pipeline: raw categorical selections to the numeric row a model
//! expects.
//!
//! Numeric fields pass through untouched. Range checks belong to
//! [`inference::validate`](crate::inference::validate), not here.

use salarium_core::{CategoricalField, EncodedRecord, EncoderBundle, PredictionRequest};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("unknown {field} '{value}': not in the encoder vocabulary")]
    UnknownCategory {
        field: CategoricalField,
        value: String,
    },
}

/// Look up the code for `raw` in the vocabulary of `field`.
pub fn encode_category(
    bundle: &EncoderBundle,
    field: CategoricalField,
    raw: &str,
) -> Result<u32, EncodeError> {
    bundle
        .encoder(field)
        .transform(raw)
        .ok_or_else(|| EncodeError::UnknownCategory {
            field,
            value: raw.to_string(),
        })
}

/// Build the fixed-order row for a request.
///
/// Deterministic: the same bundle and request always give the same row.
pub fn build_record(
    bundle: &EncoderBundle,
    request: &PredictionRequest,
) -> Result<EncodedRecord, EncodeError> {
    let gender = encode_category(bundle, CategoricalField::Gender, &request.gender)?;
    let education = encode_category(bundle, CategoricalField::EducationLevel, &request.education)?;
    let job_title = encode_category(bundle, CategoricalField::JobTitle, &request.job_title)?;

    debug!(gender, education, job_title, "encoded categorical fields");
    Ok(EncodedRecord::new(
        request.age,
        gender,
        education,
        job_title,
        request.experience,
    ))
}
