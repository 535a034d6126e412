use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::logic::features::FeatureBatch;
use crate::logic::model::{RiskLevel, RiskPolicy};

/// One scored subject; field order is the CSV column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub player_name: String,
    pub position: String,
    pub risk_probability: f64,
    /// 1 when flagged by the decision threshold
    pub risk_prediction: u8,
    pub risk_level: RiskLevel,
    pub prediction_date: NaiveDate,
}

impl PredictionResult {
    pub fn is_flagged(&self) -> bool {
        self.risk_prediction == 1
    }
}

/// Flag, bucket and date-stamp every probability of a batch
pub fn assess_batch(
    batch: &FeatureBatch,
    probabilities: &[f64],
    policy: &RiskPolicy,
    date: NaiveDate,
) -> PipelineResult<Vec<PredictionResult>> {
    if probabilities.len() != batch.len() {
        return Err(PipelineError::Inference(format!(
            "{} probabilities for {} subjects",
            probabilities.len(),
            batch.len()
        )));
    }

    let results = batch
        .subjects
        .iter()
        .zip(probabilities)
        .map(|(subject, &p)| {
            let (flagged, level) = policy.assess(p);
            let result = PredictionResult {
                player_name: subject.name.clone(),
                position: subject.position.clone(),
                risk_probability: p,
                risk_prediction: u8::from(flagged),
                risk_level: level,
                prediction_date: date,
            };
            log::debug!(
                "{}: risk={:.3} level={} flagged={}",
                result.player_name,
                p,
                result.risk_level,
                result.risk_prediction
            );
            result
        })
        .collect();

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::artifacts::FeatureSchema;
    use crate::logic::features::Subject;

    fn batch(n: usize) -> FeatureBatch {
        let schema = FeatureSchema::from_names(&["x"]).unwrap();
        let subjects = (0..n).map(|i| Subject::new(&format!("P{}", i), "G", None)).collect();
        let rows = (0..n).map(|i| vec![i as f64]).collect();
        FeatureBatch::from_rows(&schema, subjects, rows).unwrap()
    }

    #[test]
    fn test_assess_flags_and_buckets() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
        let results = assess_batch(&batch(4), &[0.05, 0.2, 0.5, 0.95], &RiskPolicy::default(), date).unwrap();

        let levels: Vec<RiskLevel> = results.iter().map(|r| r.risk_level).collect();
        assert_eq!(
            levels,
            vec![RiskLevel::Low, RiskLevel::Medium, RiskLevel::Critical, RiskLevel::Critical]
        );
        let flags: Vec<u8> = results.iter().map(|r| r.risk_prediction).collect();
        assert_eq!(flags, vec![0, 0, 1, 1]);
        assert!(results.iter().all(|r| r.prediction_date == date));
        assert_eq!(results[2].player_name, "P2");
    }

    #[test]
    fn test_model_variant_threshold() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
        let results = assess_batch(&batch(2), &[0.19, 0.2], &RiskPolicy::model_variant(), date).unwrap();
        assert!(!results[0].is_flagged());
        assert!(results[1].is_flagged());
    }

    #[test]
    fn test_length_mismatch() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
        assert!(assess_batch(&batch(2), &[0.1], &RiskPolicy::default(), date).is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
        let results = assess_batch(&batch(1), &[0.35], &RiskPolicy::default(), date).unwrap();
        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json["risk_level"], "High");
        assert_eq!(json["prediction_date"], "2025-08-20");
        assert_eq!(json["risk_prediction"], 0);
    }
}
