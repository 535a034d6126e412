//! Gradient boosted tree ensemble
//!
//! Trees use the flat node arrays of XGBoost's JSON dump. A node is a leaf
//! when its left child is `-1`; for leaves `split_conditions` holds the leaf
//! value. Rows go left when `x < condition`, and missing (NaN) values follow
//! `default_left`.

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{logit, sigmoid, InferenceError, RiskModel};
use crate::logic::artifacts::ArtifactError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub left_children: Vec<i32>,
    pub right_children: Vec<i32>,
    pub split_indices: Vec<usize>,
    pub split_conditions: Vec<f64>,
    #[serde(default)]
    pub default_left: Vec<bool>,
}

impl RegressionTree {
    fn len(&self) -> usize {
        self.left_children.len()
    }

    fn validate(&self, index: usize, num_features: Option<usize>) -> Result<(), ArtifactError> {
        let n = self.len();
        let invalid = |msg: String| ArtifactError::Invalid(format!("tree {}: {}", index, msg));

        if n == 0 {
            return Err(invalid("no nodes".to_string()));
        }
        if self.right_children.len() != n
            || self.split_indices.len() != n
            || self.split_conditions.len() != n
            || (!self.default_left.is_empty() && self.default_left.len() != n)
        {
            return Err(invalid("node arrays differ in length".to_string()));
        }

        for node in 0..n {
            let (left, right) = (self.left_children[node], self.right_children[node]);
            if left < 0 {
                if !self.split_conditions[node].is_finite() {
                    return Err(invalid(format!("leaf {} has a non-finite value", node)));
                }
                continue;
            }
            // Children after parents guarantees traversal terminates
            for child in [left, right] {
                if child <= node as i32 || child as usize >= n {
                    return Err(invalid(format!("node {} has bad child {}", node, child)));
                }
            }
            if let Some(limit) = num_features {
                if self.split_indices[node] >= limit {
                    return Err(invalid(format!(
                        "node {} splits on feature {} of {}",
                        node, self.split_indices[node], limit
                    )));
                }
            }
        }
        Ok(())
    }

    fn leaf_value(&self, row: ArrayView1<'_, f64>) -> Result<f64, InferenceError> {
        let mut node = 0usize;
        loop {
            let left = self.left_children[node];
            if left < 0 {
                return Ok(self.split_conditions[node]);
            }

            let feature = self.split_indices[node];
            let value = row.get(feature).copied().ok_or_else(|| {
                InferenceError(format!("split on feature {} but row has {}", feature, row.len()))
            })?;

            let go_left = if value.is_nan() {
                self.default_left.get(node).copied().unwrap_or(true)
            } else {
                value < self.split_conditions[node]
            };

            node = if go_left {
                left as usize
            } else {
                self.right_children[node] as usize
            };
        }
    }
}

fn default_base_score() -> f64 {
    0.5
}

/// Binary logistic ensemble: P = sigmoid(logit(base_score) + Σ leaves)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default = "default_base_score")]
    pub base_score: f64,
    #[serde(default)]
    pub num_features: Option<usize>,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if !(self.base_score > 0.0 && self.base_score < 1.0) {
            return Err(ArtifactError::Invalid(format!(
                "base_score {} is not a probability",
                self.base_score
            )));
        }
        if self.trees.is_empty() {
            return Err(ArtifactError::Invalid("ensemble has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.num_features)?;
        }
        Ok(())
    }

    pub fn margin(&self, row: ArrayView1<'_, f64>) -> Result<f64, InferenceError> {
        let mut margin = logit(self.base_score);
        for tree in &self.trees {
            margin += tree.leaf_value(row)?;
        }
        Ok(margin)
    }
}

impl RiskModel for TreeEnsemble {
    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }

    fn n_features(&self) -> Option<usize> {
        self.num_features
    }

    fn predict_proba(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<f64>, InferenceError> {
        batch
            .rows()
            .into_iter()
            .map(|row| self.margin(row).map(sigmoid))
            .collect()
    }
}
