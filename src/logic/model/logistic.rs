use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{sigmoid, InferenceError, RiskModel};
use crate::logic::artifacts::ArtifactError;

/// P = sigmoid(w·x + b)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.coefficients.is_empty() {
            return Err(ArtifactError::Invalid("logistic model has no coefficients".to_string()));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::Invalid("logistic model has non-finite weights".to_string()));
        }
        Ok(())
    }
}

impl RiskModel for LogisticModel {
    fn kind(&self) -> &'static str {
        "logistic"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict_proba(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<f64>, InferenceError> {
        if batch.ncols() != self.coefficients.len() {
            return Err(InferenceError(format!(
                "model expects {} features, batch has {}",
                self.coefficients.len(),
                batch.ncols()
            )));
        }

        let weights = Array1::from(self.coefficients.clone());
        let margins = batch.dot(&weights) + self.intercept;

        margins
            .iter()
            .enumerate()
            .map(|(i, m)| {
                if m.is_finite() {
                    Ok(sigmoid(*m))
                } else {
                    Err(InferenceError(format!("non-finite margin for row {}", i)))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_linear_margin() {
        let model = LogisticModel {
            coefficients: vec![2.0, -1.0],
            intercept: 0.5,
        };
        let probs = model.predict_proba(array![[1.0, 1.0], [0.0, 0.5]].view()).unwrap();
        assert_abs_diff_eq!(probs[0], sigmoid(1.5), epsilon = 1e-12);
        assert_abs_diff_eq!(probs[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_feature_is_an_error() {
        let model = LogisticModel {
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        assert!(model.predict_proba(array![[f64::NAN]].view()).is_err());
    }

    #[test]
    fn test_width_mismatch() {
        let model = LogisticModel {
            coefficients: vec![1.0, 1.0],
            intercept: 0.0,
        };
        assert!(model.predict_proba(array![[1.0]].view()).is_err());
    }
}
