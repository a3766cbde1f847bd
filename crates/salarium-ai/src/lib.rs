//! Inference layer: encode form input with the fitted label encoders and run
//! it through a loaded predictor.

pub mod encoding;
pub mod inference;

pub use encoding::{EncodeError, build_record, encode_category};
pub use inference::{InferenceError, ValidationError, predict, validate};
