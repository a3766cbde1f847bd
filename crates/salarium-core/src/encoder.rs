//! Fitted label encoders for the categorical request fields.
//!
//! A [`LabelEncoder`] is an ordered vocabulary: a class's code is its position
//! in `classes`. Encoders are immutable once built; unseen strings never map
//! to a default code.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    #[error("encoder vocabulary is empty")]
    EmptyVocabulary,

    #[error("class '{0}' appears more than once in the vocabulary")]
    DuplicateClass(String),
}

/// The categorical fields a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Gender,
    EducationLevel,
    JobTitle,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 3] = [
        CategoricalField::Gender,
        CategoricalField::EducationLevel,
        CategoricalField::JobTitle,
    ];

    /// Name used as the key in the encoder artifact.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::EducationLevel => "Education Level",
            Self::JobTitle => "Job Title",
        }
    }

    /// Case-insensitive lookup by artifact name or a short alias.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match key.as_str() {
            "gender" => Some(Self::Gender),
            "education level" | "education" => Some(Self::EducationLevel),
            "job title" | "job" => Some(Self::JobTitle),
            _ => None,
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// On-disk form of a label encoder.
#[derive(Serialize, Deserialize)]
struct RawLabelEncoder {
    classes: Vec<String>,
}

/// Bidirectional mapping between category strings and integer codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLabelEncoder", into = "RawLabelEncoder")]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Result<Self, EncoderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        if classes.is_empty() {
            return Err(EncoderError::EmptyVocabulary);
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code as u32).is_some() {
                return Err(EncoderError::DuplicateClass(class.clone()));
            }
        }

        Ok(Self { classes, codes })
    }

    /// Known classes in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.codes.contains_key(value)
    }

    /// Code for a known class; `None` for anything outside the vocabulary.
    pub fn transform(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }

    pub fn inverse_transform(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }
}

impl TryFrom<RawLabelEncoder> for LabelEncoder {
    type Error = EncoderError;

    fn try_from(raw: RawLabelEncoder) -> Result<Self, Self::Error> {
        Self::new(raw.classes)
    }
}

impl From<LabelEncoder> for RawLabelEncoder {
    fn from(encoder: LabelEncoder) -> Self {
        Self {
            classes: encoder.classes,
        }
    }
}

/// The shared encoder artifact: one encoder per categorical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderBundle {
    #[serde(rename = "Gender")]
    gender: LabelEncoder,
    #[serde(rename = "Education Level")]
    education: LabelEncoder,
    #[serde(rename = "Job Title")]
    job_title: LabelEncoder,
}

impl EncoderBundle {
    pub fn new(gender: LabelEncoder, education: LabelEncoder, job_title: LabelEncoder) -> Self {
        Self {
            gender,
            education,
            job_title,
        }
    }

    pub fn encoder(&self, field: CategoricalField) -> &LabelEncoder {
        match field {
            CategoricalField::Gender => &self.gender,
            CategoricalField::EducationLevel => &self.education,
            CategoricalField::JobTitle => &self.job_title,
        }
    }

    /// Selectable values for a field. Input choices must come from here so that
    /// every offered option is encodable.
    pub fn options(&self, field: CategoricalField) -> &[String] {
        self.encoder(field).classes()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> EncoderBundle {
        EncoderBundle::new(
            LabelEncoder::new(["Female", "Male"]).unwrap(),
            LabelEncoder::new(["Bachelor's", "Master's", "PhD"]).unwrap(),
            LabelEncoder::new(["Data Analyst", "Manager", "Software Engineer"]).unwrap(),
        )
    }

    #[test]
    fn codes_follow_vocabulary_order() {
        let enc = LabelEncoder::new(["Female", "Male"]).unwrap();
        assert_eq!(enc.transform("Female"), Some(0));
        assert_eq!(enc.transform("Male"), Some(1));
        assert_eq!(enc.len(), 2);
    }

    #[test]
    fn unseen_value_has_no_code() {
        let enc = LabelEncoder::new(["Female", "Male"]).unwrap();
        assert_eq!(enc.transform("Nonbinary"), None);
        assert_eq!(enc.transform("female"), None);
        assert!(!enc.contains("Nonbinary"));
    }

    #[test]
    fn every_class_round_trips() {
        let b = bundle();
        for field in CategoricalField::ALL {
            let enc = b.encoder(field);
            for class in enc.classes() {
                let code = enc.transform(class).unwrap();
                assert_eq!(enc.inverse_transform(code), Some(class.as_str()));
            }
        }
    }

    #[test]
    fn inverse_out_of_range_is_none() {
        let enc = LabelEncoder::new(["A"]).unwrap();
        assert_eq!(enc.inverse_transform(1), None);
    }

    #[test]
    fn rejects_empty_and_duplicate_vocabularies() {
        assert_eq!(
            LabelEncoder::new(Vec::<String>::new()),
            Err(EncoderError::EmptyVocabulary)
        );
        assert_eq!(
            LabelEncoder::new(["Male", "Female", "Male"]),
            Err(EncoderError::DuplicateClass("Male".into()))
        );
    }

    #[test]
    fn bundle_parses_artifact_json() {
        let json = r#"{
            "Gender": {"classes": ["Female", "Male"]},
            "Education Level": {"classes": ["Bachelor's", "Master's", "PhD"]},
            "Job Title": {"classes": ["Data Analyst", "Manager", "Software Engineer"]}
        }"#;
        let parsed = EncoderBundle::from_json(json).unwrap();
        assert_eq!(parsed, bundle());
        assert_eq!(
            parsed.options(CategoricalField::JobTitle),
            &["Data Analyst", "Manager", "Software Engineer"]
        );
    }

    #[test]
    fn bundle_missing_field_fails_to_parse() {
        let json = r#"{
            "Gender": {"classes": ["Female", "Male"]},
            "Job Title": {"classes": ["Manager"]}
        }"#;
        assert!(EncoderBundle::from_json(json).is_err());
    }

    #[test]
    fn bundle_with_duplicate_class_fails_to_parse() {
        let json = r#"{
            "Gender": {"classes": ["Female", "Female"]},
            "Education Level": {"classes": ["PhD"]},
            "Job Title": {"classes": ["Manager"]}
        }"#;
        let err = EncoderBundle::from_json(json).unwrap_err();
        assert!(err.to_string().contains("Female"), "{err}");
    }

    #[test]
    fn bundle_serializes_back_to_artifact_shape() {
        let json = serde_json::to_value(bundle()).unwrap();
        assert_eq!(json["Gender"]["classes"][1], "Male");
        assert_eq!(json["Education Level"]["classes"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn field_lookup_by_name() {
        assert_eq!(CategoricalField::from_name("Gender"), Some(CategoricalField::Gender));
        assert_eq!(
            CategoricalField::from_name("education-level"),
            Some(CategoricalField::EducationLevel)
        );
        assert_eq!(CategoricalField::from_name("job"), Some(CategoricalField::JobTitle));
        assert_eq!(CategoricalField::from_name("salary"), None);
    }
}
