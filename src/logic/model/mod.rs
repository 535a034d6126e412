//! Model Module - Injury risk classifiers
//!
//! Keeps model decoding separate from scoring so formats can be swapped
//! without touching the pipeline.
//!
//! - `tree` - gradient boosted trees (XGBoost-style JSON dump)
//! - `logistic` - linear model with sigmoid link
//! - `onnx` - ONNX Runtime session (cargo feature `onnx`)
//! - `heuristic` - hand-weighted rules, NOT a model; used by the heuristic scorer
//! - `threshold` - decision threshold and risk buckets

pub mod heuristic;
pub mod logistic;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod threshold;
pub mod tree;

pub use heuristic::{HeuristicRules, RiskFactor};
pub use logistic::LogisticModel;
pub use threshold::{RiskLevel, RiskPolicy};
pub use tree::{RegressionTree, TreeEnsemble};

use ndarray::ArrayView2;
use serde::Deserialize;
use thiserror::Error;

use crate::logic::artifacts::ArtifactError;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Model evaluation failed; callers add their own context
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InferenceError(pub String);

// ============================================================================
// MODEL TRAIT
// ============================================================================

/// Binary classifier producing P(injury) per row
pub trait RiskModel {
    fn kind(&self) -> &'static str;

    /// Feature count the model was trained on, if the artifact records it
    fn n_features(&self) -> Option<usize>;

    /// One probability of the positive class per row of an already scaled batch
    fn predict_proba(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<f64>, InferenceError>;
}

// ============================================================================
// DECODING
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelDocument {
    TreeEnsemble(TreeEnsemble),
    Logistic(LogisticModel),
}

/// Decode a model blob: JSON documents natively, anything else as ONNX
pub fn decode_model(bytes: &[u8]) -> Result<Box<dyn RiskModel>, ArtifactError> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());

    match first {
        None => Err(ArtifactError::Invalid("model payload is empty".to_string())),
        Some(b'{') => match serde_json::from_slice::<ModelDocument>(bytes)? {
            ModelDocument::TreeEnsemble(model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
            ModelDocument::Logistic(model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
        },
        Some(_) => decode_binary(bytes),
    }
}

#[cfg(feature = "onnx")]
fn decode_binary(bytes: &[u8]) -> Result<Box<dyn RiskModel>, ArtifactError> {
    Ok(Box::new(onnx::OnnxModel::from_bytes(bytes)?))
}

#[cfg(not(feature = "onnx"))]
fn decode_binary(bytes: &[u8]) -> Result<Box<dyn RiskModel>, ArtifactError> {
    Err(ArtifactError::Unsupported(format!(
        "binary payload of {} bytes; build with the `onnx` feature to load ONNX graphs",
        bytes.len()
    )))
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Inverse of `sigmoid`, for probability-space base scores
pub(crate) fn logit(p: f64) -> f64 {
    let p = p.clamp(1e-12, 1.0 - 1e-12);
    (p / (1.0 - p)).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_inference_message_has_one_prefix() {
        let model = LogisticModel {
            coefficients: vec![1.0, 2.0],
            intercept: 0.0,
        };
        let batch = ndarray::Array2::<f64>::zeros((1, 3));
        let err = model.predict_proba(batch.view()).unwrap_err();
        assert_eq!(err.to_string(), "model expects 2 features, batch has 3");

        let wrapped = crate::error::PipelineError::Inference(err.to_string());
        assert_eq!(
            wrapped.to_string(),
            "Inference failure: model expects 2 features, batch has 3"
        );
    }

    #[test]
    fn test_sigmoid_logit_inverse() {
        for p in [0.01, 0.2, 0.5, 0.8, 0.99] {
            assert_abs_diff_eq!(sigmoid(logit(p)), p, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(logit(0.5), 0.0);
    }

    #[test]
    fn test_decode_dispatches_on_kind() {
        let model = decode_model(br#"{"kind": "logistic", "coefficients": [1.0], "intercept": 0.0}"#)
            .unwrap();
        assert_eq!(model.kind(), "logistic");
        assert_eq!(model.n_features(), Some(1));
    }

    #[test]
    fn test_decode_rejects_empty_and_unknown() {
        assert!(matches!(decode_model(b"  "), Err(ArtifactError::Invalid(_))));
        assert!(matches!(
            decode_model(br#"{"kind": "random_forest"}"#),
            Err(ArtifactError::Malformed(_))
        ));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_binary_payload_needs_onnx_feature() {
        // Start of a pickle stream
        let err = decode_model(&[0x80, 0x04, 0x95]).err().unwrap();
        assert!(matches!(err, ArtifactError::Unsupported(_)));
    }
}
