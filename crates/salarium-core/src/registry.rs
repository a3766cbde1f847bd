//! Model registry and on-disk artifact layout.
//!
//! Every path the tool reads is derived from a single artifact root so a
//! deployment can be relocated with one setting.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shared encoder bundle file name.
pub const ENCODERS_FILE: &str = "encoders.json";

/// Optional evaluation summary file name.
pub const SUMMARY_FILE: &str = "model_evaluation_summary.csv";

/// The fixed set of selectable models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    RandomForest,
    #[serde(rename = "xgboost")]
    XgBoost,
    LinearRegression,
}

impl ModelKind {
    /// All kinds, in selection order.
    pub const ALL: [ModelKind; 3] = [
        ModelKind::RandomForest,
        ModelKind::XgBoost,
        ModelKind::LinearRegression,
    ];

    /// Position within [`ModelKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::RandomForest => 0,
            Self::XgBoost => 1,
            Self::LinearRegression => 2,
        }
    }

    /// Human-readable name, also used as prediction provenance.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::RandomForest => "Random Forest",
            Self::XgBoost => "XGBoost",
            Self::LinearRegression => "Linear Regression",
        }
    }

    /// Canonical artifact file name relative to the artifact root.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::RandomForest => "random_forest_model.json",
            Self::XgBoost => "xgboost_model.json",
            Self::LinearRegression => "linear_model.json",
        }
    }

    /// Tag stored in the artifact's `kind` field.
    pub fn tag(self) -> &'static str {
        match self {
            Self::RandomForest => "random_forest",
            Self::XgBoost => "xgboost",
            Self::LinearRegression => "linear_regression",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown model '{0}' (expected one of: Random Forest, XGBoost, Linear Regression)")]
pub struct ParseModelKindError(pub String);

impl FromStr for ModelKind {
    type Err = ParseModelKindError;

    /// Accepts display names case-insensitively plus short slugs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "randomforest" | "rf" => Ok(Self::RandomForest),
            "xgboost" | "xgb" => Ok(Self::XgBoost),
            "linearregression" | "linear" | "lr" => Ok(Self::LinearRegression),
            _ => Err(ParseModelKindError(s.to_string())),
        }
    }
}

/// Where artifacts live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn model_path(&self, kind: ModelKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    pub fn encoders_path(&self) -> PathBuf {
        self.root.join(ENCODERS_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join(SUMMARY_FILE)
    }
}

/// Immutable mapping from model kind to artifact path, fixed at startup.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    paths: [PathBuf; 3],
}

impl ModelRegistry {
    pub fn from_layout(layout: &ArtifactLayout) -> Self {
        Self {
            paths: ModelKind::ALL.map(|kind| layout.model_path(kind)),
        }
    }

    /// Registered kinds in selection order.
    pub fn kinds(&self) -> impl Iterator<Item = ModelKind> {
        ModelKind::ALL.into_iter()
    }

    pub fn path(&self, kind: ModelKind) -> &Path {
        &self.paths[kind.index()]
    }

    pub fn entries(&self) -> impl Iterator<Item = (ModelKind, &Path)> {
        ModelKind::ALL
            .into_iter()
            .zip(self.paths.iter().map(PathBuf::as_path))
    }
}
