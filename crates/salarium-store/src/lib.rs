//! Storage layer: on-disk model and encoder artifacts, and the optional
//! evaluation summary table.

mod error;
pub use error::StoreError;

mod artifact;
pub use artifact::ArtifactStore;

pub mod summary;
pub use summary::EvaluationSummary;

