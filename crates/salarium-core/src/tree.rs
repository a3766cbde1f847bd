//! Regression trees stored as flat node arrays.
//!
//! Node 0 is the root. Split children always point forward in the array, so a
//! tree is acyclic and every traversal ends at a leaf. Both [`Tree::new`] and
//! deserialization check this before a `Tree` exists.

use serde::{Deserialize, Serialize};

use crate::model::ModelError;
use crate::schema::{EncodedRecord, FEATURE_COUNT};

/// How a split compares a feature value with its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    /// Go left when `x <= threshold` (scikit-learn trees).
    LessOrEqual,
    /// Go left when `x < threshold` (XGBoost trees).
    Less,
}

impl SplitRule {
    fn goes_left(self, x: f64, threshold: f64) -> bool {
        match self {
            Self::LessOrEqual => x <= threshold,
            Self::Less => x < threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl Node {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    pub fn leaf(value: f64) -> Self {
        Self::Leaf { value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTree", into = "RawTree")]
pub struct Tree {
    nodes: Vec<Node>,
}

/// On-disk form of a tree, before validation.
#[derive(Serialize, Deserialize)]
struct RawTree {
    nodes: Vec<Node>,
}

impl TryFrom<RawTree> for Tree {
    type Error = ModelError;

    fn try_from(raw: RawTree) -> Result<Self, Self::Error> {
        Tree::new(raw.nodes)
    }
}

impl From<Tree> for RawTree {
    fn from(tree: Tree) -> Self {
        RawTree { nodes: tree.nodes }
    }
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Result<Self, ModelError> {
        validate(&nodes)?;
        Ok(Self { nodes })
    }

    /// Walk from the root to a leaf.
    pub fn evaluate(&self, record: &EncodedRecord, rule: SplitRule) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = record.values()[feature];
                    idx = if rule.goes_left(x, threshold) { left } else { right };
                }
            }
        }
    }
}

/// Child indices must point forward and stay in range, split features must
/// exist in the row, and every number must be finite.
fn validate(nodes: &[Node]) -> Result<(), ModelError> {
    if nodes.is_empty() {
        return Err(ModelError::MalformedTree("tree has no nodes".into()));
    }

    for (idx, node) in nodes.iter().enumerate() {
        match *node {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature >= FEATURE_COUNT {
                    return Err(ModelError::MalformedTree(format!(
                        "node {idx} splits on feature {feature}, but rows have {FEATURE_COUNT} columns"
                    )));
                }
                if !threshold.is_finite() {
                    return Err(ModelError::MalformedTree(format!(
                        "node {idx} has a non-finite threshold"
                    )));
                }
                for child in [left, right] {
                    if child <= idx || child >= nodes.len() {
                        return Err(ModelError::MalformedTree(format!(
                            "node {idx} points to invalid child {child}"
                        )));
                    }
                }
            }
            Node::Leaf { value } => {
                if !value.is_finite() {
                    return Err(ModelError::MalformedTree(format!(
                        "leaf {idx} has a non-finite value"
                    )));
                }
            }
        }
    }
    Ok(())
}
