//! Submission pipeline: resolve the selected model, load artifacts, run inference.

use anyhow::Context;
use salarium_core::request::{AGE_FORM_RANGE, EXPERIENCE_FORM_RANGE};
use salarium_core::{ModelKind, PredictionRequest, PredictionResult, Submission};
use salarium_store::ArtifactStore;
use tracing::warn;

/// Run one form submission end to end.
///
/// The selected model is loaded before the encoders, and both before the
/// request is validated. Any failure aborts the submission.
pub fn run_submission(
    store: &ArtifactStore,
    submission: &Submission,
) -> anyhow::Result<PredictionResult> {
    let kind: ModelKind = submission.selected_model.parse()?;
    let model = store
        .load_model(kind)
        .with_context(|| format!("loading {kind} model"))?;
    let encoders = store.load_encoders().context("loading encoders")?;

    warn_outside_form_ranges(&submission.request);

    let result = salarium_ai::predict(model.as_ref(), &encoders, &submission.request)?;
    Ok(result)
}

/// Form ranges are advisory: values past the upper limits are logged, not
/// rejected. Values below the lower limits fail validation instead.
fn warn_outside_form_ranges(request: &PredictionRequest) {
    if request.age > *AGE_FORM_RANGE.end() {
        warn!(
            age = request.age,
            max = AGE_FORM_RANGE.end(),
            "age is above the form range"
        );
    }
    if request.experience > *EXPERIENCE_FORM_RANGE.end() {
        warn!(
            experience = request.experience,
            max = EXPERIENCE_FORM_RANGE.end(),
            "experience is above the form range"
        );
    }
}
