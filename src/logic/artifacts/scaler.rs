//! Fitted feature scaler
//!
//! Every supported scaler reduces to `(x - center) / scale` per column:
//! - standard: center = mean, scale = std
//! - robust: center = median, scale = IQR
//! - min_max: center = min, scale = max - min
//!
//! Zero or non-finite scales are treated as 1, as the fitting side does.

use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use super::ArtifactError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerKind {
    Standard,
    Robust,
    MinMax,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScalerDocument {
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
    Robust {
        center: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
    MinMax {
        min: Vec<f64>,
        max: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone)]
pub struct Scaler {
    kind: ScalerKind,
    center: Array1<f64>,
    scale: Array1<f64>,
    feature_names: Option<Vec<String>>,
}

impl Scaler {
    pub fn new(kind: ScalerKind, center: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        if center.len() != scale.len() {
            return Err(ArtifactError::Invalid(format!(
                "scaler has {} centers but {} scales",
                center.len(),
                scale.len()
            )));
        }
        if center.is_empty() {
            return Err(ArtifactError::Invalid("scaler has no features".to_string()));
        }
        if let Some(i) = center.iter().position(|c| !c.is_finite()) {
            return Err(ArtifactError::Invalid(format!("non-finite center at feature {}", i)));
        }

        let scale = scale
            .into_iter()
            .map(|s| if s.is_finite() && s != 0.0 { s } else { 1.0 })
            .collect::<Vec<_>>();

        Ok(Self {
            kind,
            center: Array1::from(center),
            scale: Array1::from(scale),
            feature_names: None,
        })
    }

    /// Identity transform over `n` features
    pub fn identity(n: usize) -> Result<Self, ArtifactError> {
        Self::new(ScalerKind::Standard, vec![0.0; n], vec![1.0; n])
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let doc: ScalerDocument = serde_json::from_slice(bytes)?;
        let (scaler, names) = match doc {
            ScalerDocument::Standard { mean, scale, feature_names } => {
                (Self::new(ScalerKind::Standard, mean, scale)?, feature_names)
            }
            ScalerDocument::Robust { center, scale, feature_names } => {
                (Self::new(ScalerKind::Robust, center, scale)?, feature_names)
            }
            ScalerDocument::MinMax { min, max, feature_names } => {
                if min.len() != max.len() {
                    return Err(ArtifactError::Invalid(format!(
                        "min_max scaler has {} minimums but {} maximums",
                        min.len(),
                        max.len()
                    )));
                }
                let range = min.iter().zip(&max).map(|(lo, hi)| hi - lo).collect();
                (Self::new(ScalerKind::MinMax, min, range)?, feature_names)
            }
        };

        match names {
            Some(names) if names.len() != scaler.len() => Err(ArtifactError::Invalid(format!(
                "scaler lists {} feature names for {} features",
                names.len(),
                scaler.len()
            ))),
            names => Ok(Self { feature_names: names, ..scaler }),
        }
    }

    pub fn kind(&self) -> ScalerKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.center.len()
    }

    pub fn is_empty(&self) -> bool {
        self.center.is_empty()
    }

    /// Names the scaler was fitted on, when the artifact recorded them
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Apply the per-column transform to a batch (rows = subjects)
    pub fn transform(&self, batch: ArrayView2<'_, f64>) -> Result<Array2<f64>, String> {
        if batch.ncols() != self.len() {
            return Err(format!(
                "scaler expects {} features, batch has {}",
                self.len(),
                batch.ncols()
            ));
        }

        let centered = &batch - &self.center;
        Ok(centered / &self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_robust_transform() {
        let scaler = Scaler::from_json(
            br#"{"kind": "robust", "center": [10.0, 0.5], "scale": [2.0, 0.25]}"#,
        )
        .unwrap();
        let out = scaler.transform(array![[12.0, 0.75], [8.0, 0.5]].view()).unwrap();

        assert_abs_diff_eq!(out[[0, 0]], 1.0);
        assert_abs_diff_eq!(out[[0, 1]], 1.0);
        assert_abs_diff_eq!(out[[1, 0]], -1.0);
        assert_abs_diff_eq!(out[[1, 1]], 0.0);
    }

    #[test]
    fn test_min_max_uses_range() {
        let scaler =
            Scaler::from_json(br#"{"kind": "min_max", "min": [0.0], "max": [4.0]}"#).unwrap();
        assert_eq!(scaler.kind(), ScalerKind::MinMax);
        let out = scaler.transform(array![[1.0], [6.0]].view()).unwrap();
        assert_abs_diff_eq!(out[[0, 0]], 0.25);
        // sklearn does not clip by default
        assert_abs_diff_eq!(out[[1, 0]], 1.5);
    }

    #[test]
    fn test_zero_scale_is_treated_as_one() {
        let scaler = Scaler::new(ScalerKind::Standard, vec![1.0], vec![0.0]).unwrap();
        let out = scaler.transform(array![[3.0]].view()).unwrap();
        assert_abs_diff_eq!(out[[0, 0]], 2.0);
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let scaler = Scaler::identity(3).unwrap();
        assert!(scaler.transform(array![[1.0, 2.0]].view()).is_err());
    }

    #[test]
    fn test_length_disagreement_is_invalid() {
        let err = Scaler::from_json(br#"{"kind": "standard", "mean": [0.0, 1.0], "scale": [1.0]}"#)
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));

        let err = Scaler::from_json(
            br#"{"kind": "standard", "mean": [0.0], "scale": [1.0], "feature_names": ["a", "b"]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn test_unknown_kind_is_malformed() {
        let err = Scaler::from_json(br#"{"kind": "quantile", "center": [0.0]}"#).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed(_)));
    }
}
