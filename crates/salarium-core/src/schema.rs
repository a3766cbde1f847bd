//! Feature schema shared by the encoder, the predictors, and every model artifact.

use serde::{Deserialize, Serialize};

/// Number of columns in an encoded row.
pub const FEATURE_COUNT: usize = 5;

/// Column names in the order the models were trained on.
///
/// Changing this order invalidates every model artifact on disk.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Age",
    "Gender",
    "Education Level",
    "Job Title",
    "Years of Experience",
];

/// Column positions within an [`EncodedRecord`].
pub mod column {
    pub const AGE: usize = 0;
    pub const GENDER: usize = 1;
    pub const EDUCATION: usize = 2;
    pub const JOB_TITLE: usize = 3;
    pub const EXPERIENCE: usize = 4;
}

/// One fixed-order numeric row ready for model input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodedRecord {
    values: [f64; FEATURE_COUNT],
}

impl EncodedRecord {
    pub fn new(
        age: i32,
        gender: u32,
        education: u32,
        job_title: u32,
        experience: i32,
    ) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        values[column::AGE] = f64::from(age);
        values[column::GENDER] = f64::from(gender);
        values[column::EDUCATION] = f64::from(education);
        values[column::JOB_TITLE] = f64::from(job_title);
        values[column::EXPERIENCE] = f64::from(experience);
        Self { values }
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Value at a column position, `None` when out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// `(name, value)` pairs in feature order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}
