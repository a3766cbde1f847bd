use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("artifact {} is corrupt: {reason}", .path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    #[error(transparent)]
    UnknownModel(#[from] salarium_core::ParseModelKindError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("evaluation summary unavailable at {}: {reason}", .path.display())]
    SummaryUnavailable { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn corrupt(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::ArtifactCorrupt {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
