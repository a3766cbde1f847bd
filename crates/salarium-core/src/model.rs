//! Regression models and the [`Predictor`] capability they share.
//!
//! Model artifacts are JSON documents tagged with a `kind`:
//!
//! ```json
//! { "kind": "random_forest", "feature_names": [...], "trees": [...] }
//! { "kind": "xgboost", "feature_names": [...], "base_score": 0.5, "trees": [...] }
//! { "kind": "linear_regression", "feature_names": [...], "intercept": 0.0, "coefficients": [...] }
//! ```
//!
//! `feature_names` is optional. When present it must equal [`FEATURE_NAMES`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::ModelKind;
use crate::schema::{EncodedRecord, FEATURE_COUNT, FEATURE_NAMES};
use crate::tree::{SplitRule, Tree};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("artifact holds a {found} model, expected {expected}")]
    KindMismatch { expected: ModelKind, found: ModelKind },

    #[error("artifact feature order {found:?} does not match {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("{kind} artifact has no trees")]
    NoTrees { kind: ModelKind },

    #[error("malformed tree: {0}")]
    MalformedTree(String),

    #[error("{0} is not finite")]
    NonFinite(&'static str),
}

/// Anything that maps one encoded row to a salary estimate.
pub trait Predictor: Send + Sync {
    /// Which model produced the estimate.
    fn kind(&self) -> ModelKind;

    fn predict(&self, record: &EncodedRecord) -> f64;

    /// Batch form. Output has one value per input row.
    fn predict_rows(&self, rows: &[EncodedRecord]) -> Vec<f64> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

/// Bagged ensemble of regression trees; output is the mean leaf value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<Tree>,
}

impl RandomForest {
    fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NoTrees {
                kind: ModelKind::RandomForest,
            });
        }
        Ok(())
    }
}

impl Predictor for RandomForest {
    fn kind(&self) -> ModelKind {
        ModelKind::RandomForest
    }

    fn predict(&self, record: &EncodedRecord) -> f64 {
        let total: f64 = self
            .trees
            .iter()
            .map(|t| t.evaluate(record, SplitRule::LessOrEqual))
            .sum();
        total / self.trees.len() as f64
    }
}

/// Gradient-boosted trees; output is `base_score` plus every tree's leaf.
///
/// Leaf values already include the learning rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoosted {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl GradientBoosted {
    fn validate(&self) -> Result<(), ModelError> {
        if !self.base_score.is_finite() {
            return Err(ModelError::NonFinite("base_score"));
        }
        if self.trees.is_empty() {
            return Err(ModelError::NoTrees {
                kind: ModelKind::XgBoost,
            });
        }
        Ok(())
    }
}

impl Predictor for GradientBoosted {
    fn kind(&self) -> ModelKind {
        ModelKind::XgBoost
    }

    fn predict(&self, record: &EncodedRecord) -> f64 {
        self.base_score
            + self
                .trees
                .iter()
                .map(|t| t.evaluate(record, SplitRule::Less))
                .sum::<f64>()
    }
}

/// Ordinary least squares fit: `intercept + Σ coefficient_i * x_i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub intercept: f64,
    pub coefficients: [f64; FEATURE_COUNT],
}

impl LinearRegression {
    fn validate(&self) -> Result<(), ModelError> {
        if !self.intercept.is_finite() {
            return Err(ModelError::NonFinite("intercept"));
        }
        if !self.coefficients.iter().all(|c| c.is_finite()) {
            return Err(ModelError::NonFinite("coefficients"));
        }
        Ok(())
    }
}

impl Predictor for LinearRegression {
    fn kind(&self) -> ModelKind {
        ModelKind::LinearRegression
    }

    fn predict(&self, record: &EncodedRecord) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(record.values())
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// A loaded model, selected by its [`ModelKind`] tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    RandomForest(RandomForest),
    #[serde(rename = "xgboost")]
    XgBoost(GradientBoosted),
    LinearRegression(LinearRegression),
}

impl Model {
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::RandomForest(m) => m.validate(),
            Self::XgBoost(m) => m.validate(),
            Self::LinearRegression(m) => m.validate(),
        }
    }

    fn inner(&self) -> &dyn Predictor {
        match self {
            Self::RandomForest(m) => m,
            Self::XgBoost(m) => m,
            Self::LinearRegression(m) => m,
        }
    }
}

impl Predictor for Model {
    fn kind(&self) -> ModelKind {
        self.inner().kind()
    }

    fn predict(&self, record: &EncodedRecord) -> f64 {
        self.inner().predict(record)
    }
}

/// The full on-disk document: a model plus its declared feature order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub model: Model,
}

impl ModelArtifact {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the artifact against the kind it was requested as and return the
    /// model ready for prediction.
    pub fn into_model(self, expected: ModelKind) -> Result<Model, ModelError> {
        let found = self.model.kind();
        if found != expected {
            return Err(ModelError::KindMismatch { expected, found });
        }

        if let Some(names) = self.feature_names
            && names.iter().map(String::as_str).ne(FEATURE_NAMES)
        {
            return Err(ModelError::FeatureMismatch {
                expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                found: names,
            });
        }

        self.model.validate()?;
        Ok(self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::column;
    use crate::tree::Node;

    fn record(age: i32, experience: i32) -> EncodedRecord {
        EncodedRecord::new(age, 0, 1, 1, experience)
    }

    fn forest() -> RandomForest {
        RandomForest {
            trees: vec![
                Tree::new(vec![
                    Node::split(column::AGE, 30.0, 1, 2),
                    Node::leaf(50_000.0),
                    Node::leaf(80_000.0),
                ])
                .unwrap(),
                Tree::new(vec![
                    Node::split(column::EXPERIENCE, 5.0, 1, 2),
                    Node::leaf(60_000.0),
                    Node::leaf(100_000.0),
                ])
                .unwrap(),
            ],
        }
    }

    #[test]
    fn forest_averages_trees() {
        let rf = forest();
        assert_eq!(rf.predict(&record(30, 5)), 55_000.0);
        assert_eq!(rf.predict(&record(45, 12)), 90_000.0);
    }

    #[test]
    fn boosted_sums_from_base_score() {
        let gb = GradientBoosted {
            base_score: 70_000.0,
            trees: vec![
                Tree::new(vec![
                    Node::split(column::AGE, 30.0, 1, 2),
                    Node::leaf(-10_000.0),
                    Node::leaf(15_000.0),
                ])
                .unwrap(),
                Tree::new(vec![Node::leaf(2_500.0)]).unwrap(),
            ],
        };
        // XGBoost splits are strict, so age 30 goes right.
        assert_eq!(gb.predict(&record(30, 5)), 87_500.0);
        assert_eq!(gb.predict(&record(29, 5)), 62_500.0);
    }

    #[test]
    fn linear_is_dot_product_plus_intercept() {
        let lr = LinearRegression {
            intercept: 10_000.0,
            coefficients: [1_000.0, 500.0, 2_000.0, 100.0, 3_000.0],
        };
        let r = EncodedRecord::new(30, 1, 2, 3, 5);
        assert_eq!(lr.predict(&r), 10_000.0 + 30_000.0 + 500.0 + 4_000.0 + 300.0 + 15_000.0);
    }

    #[test]
    fn model_enum_dispatches_by_kind() {
        let model = Model::RandomForest(forest());
        assert_eq!(model.kind(), ModelKind::RandomForest);
        assert_eq!(model.predict(&record(30, 5)), 55_000.0);
        assert_eq!(model.predict_rows(&[record(30, 5), record(45, 12)]), vec![55_000.0, 90_000.0]);
    }

    #[test]
    fn artifact_parses_tagged_json() {
        let json = r#"{
            "kind": "linear_regression",
            "feature_names": ["Age", "Gender", "Education Level", "Job Title", "Years of Experience"],
            "intercept": 1.5,
            "coefficients": [1.0, 0.0, 0.0, 0.0, 2.0]
        }"#;
        let model = ModelArtifact::from_json(json)
            .unwrap()
            .into_model(ModelKind::LinearRegression)
            .unwrap();
        assert_eq!(model.kind(), ModelKind::LinearRegression);
        assert_eq!(model.predict(&EncodedRecord::new(20, 0, 0, 0, 3)), 27.5);
    }

    #[test]
    fn artifact_kind_must_match_request() {
        let artifact = ModelArtifact {
            feature_names: None,
            model: Model::RandomForest(forest()),
        };
        assert_eq!(
            artifact.into_model(ModelKind::XgBoost),
            Err(ModelError::KindMismatch {
                expected: ModelKind::XgBoost,
                found: ModelKind::RandomForest,
            })
        );
    }

    #[test]
    fn artifact_feature_order_must_match_schema() {
        let mut names: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        names.swap(0, 4);
        let artifact = ModelArtifact {
            feature_names: Some(names),
            model: Model::RandomForest(forest()),
        };
        assert!(matches!(
            artifact.into_model(ModelKind::RandomForest),
            Err(ModelError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn empty_forest_is_rejected() {
        let artifact = ModelArtifact {
            feature_names: None,
            model: Model::RandomForest(RandomForest { trees: vec![] }),
        };
        assert_eq!(
            artifact.into_model(ModelKind::RandomForest),
            Err(ModelError::NoTrees {
                kind: ModelKind::RandomForest
            })
        );
    }

    #[test]
    fn artifact_serializes_with_kind_tag() {
        let artifact = ModelArtifact {
            feature_names: None,
            model: Model::XgBoost(GradientBoosted {
                base_score: 0.5,
                trees: vec![Tree::new(vec![Node::leaf(1.0)]).unwrap()],
            }),
        };
        let value = serde_json::to_value(&artifact).unwrap();
        assert_eq!(value["kind"], "xgboost");
        assert_eq!(value["base_score"], 0.5);
        assert!(value.get("feature_names").is_none());
    }

    #[test]
    fn model_json_with_bad_tree_is_rejected() {
        let err = serde_json::from_value::<Model>(serde_json::json!({
            "kind": "random_forest",
            "trees": [{"nodes": [
                {"feature": 9, "threshold": 1.0, "left": 1, "right": 2},
                {"value": 1.0},
                {"value": 2.0}
            ]}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("malformed tree"), "{err}");

        let looped = ModelArtifact::from_json(
            r#"{"kind": "xgboost", "trees": [{"nodes": [
                {"feature": 0, "threshold": 1.0, "left": 0, "right": 1},
                {"value": 1.0}
            ]}]}"#,
        );
        assert!(looped.is_err());
    }
}
