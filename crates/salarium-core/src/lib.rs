//! Core types shared across Salarium crates: the feature schema, model
//! registry, label encoders, and the predictors loaded from artifacts.

pub mod encoder;
pub mod model;
pub mod registry;
pub mod request;
pub mod schema;
pub mod tree;

pub use encoder::{CategoricalField, EncoderBundle, EncoderError, LabelEncoder};
pub use model::{
    GradientBoosted, LinearRegression, Model, ModelArtifact, ModelError, Predictor, RandomForest,
};
pub use registry::{ArtifactLayout, ModelKind, ModelRegistry, ParseModelKindError};
pub use request::{PredictionRequest, PredictionResult, Submission};
pub use schema::{EncodedRecord, FEATURE_COUNT, FEATURE_NAMES};
pub use tree::{Node, SplitRule, Tree};
