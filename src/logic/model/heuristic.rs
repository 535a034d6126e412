//! Heuristic risk rules (no model)
//!
//! Stand-in used when no trained model is available. This is NOT a model
//! and is only reachable through `HeuristicScorer`, which labels its output
//! as `heuristic`.
//!
//! Each factor normalizes one raw (unscaled) feature to [0, 1] over
//! `[low, high]` and contributes `weight` times that. Factors are looked up
//! by feature name; a feature missing from the schema contributes its
//! `default` instead.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::logic::artifacts::FeatureSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub feature: String,
    pub low: f64,
    pub high: f64,
    pub weight: f64,
    /// Raw value assumed when the schema lacks the feature
    pub default: f64,
}

impl RiskFactor {
    pub fn new(feature: &str, low: f64, high: f64, weight: f64, default: f64) -> Self {
        Self {
            feature: feature.to_string(),
            low,
            high,
            weight,
            default,
        }
    }

    /// Position of `value` inside [low, high], clamped
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.high - self.low;
        if span <= 0.0 || value.is_nan() {
            return 0.0;
        }
        ((value - self.low) / span).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicRules {
    pub factors: Vec<RiskFactor>,
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for HeuristicRules {
    fn default() -> Self {
        Self {
            factors: vec![
                // Workload: involvement per game
                RiskFactor::new("total_actions", 60.0, 100.0, 0.25, 75.0),
                RiskFactor::new("fatigue_score", 0.3, 0.9, 0.30, 0.5),
                // Contact style
                RiskFactor::new("contact_usage_rate", 0.3, 0.9, 0.20, 0.5),
                // Risk grows from 25 to 40
                RiskFactor::new("age_at_game", 25.0, 40.0, 0.15, 28.0),
                // Recent low-output games as an injury-history proxy
                RiskFactor::new("consecutive_low_games", 0.0, 3.0, 0.10, 0.0),
            ],
            floor: 0.1,
            ceiling: 0.9,
        }
    }
}

impl HeuristicRules {
    pub fn validate(&self) -> Result<(), String> {
        if self.factors.is_empty() {
            return Err("heuristic has no factors".to_string());
        }
        if !(0.0..=1.0).contains(&self.floor) || !(0.0..=1.0).contains(&self.ceiling) || self.floor > self.ceiling {
            return Err(format!("invalid clamp [{}, {}]", self.floor, self.ceiling));
        }
        for f in &self.factors {
            if f.high <= f.low {
                return Err(format!("factor '{}' has an empty range", f.feature));
            }
            if f.weight < 0.0 || !f.weight.is_finite() {
                return Err(format!("factor '{}' has invalid weight {}", f.feature, f.weight));
            }
        }
        Ok(())
    }

    /// Resolve factor columns against a schema
    pub fn bind(&self, schema: &FeatureSchema) -> BoundHeuristic {
        let columns = self
            .factors
            .iter()
            .map(|f| {
                let column = schema.index_of(&f.feature);
                if column.is_none() {
                    log::warn!("Heuristic feature '{}' not in schema, using default {}", f.feature, f.default);
                }
                column
            })
            .collect();

        BoundHeuristic {
            rules: self.clone(),
            columns,
        }
    }
}

/// Rules with feature columns resolved
#[derive(Debug, Clone)]
pub struct BoundHeuristic {
    rules: HeuristicRules,
    columns: Vec<Option<usize>>,
}

impl BoundHeuristic {
    pub fn score(&self, row: ArrayView1<'_, f64>) -> f64 {
        let raw: f64 = self
            .rules
            .factors
            .iter()
            .zip(&self.columns)
            .map(|(factor, column)| {
                let value = column
                    .and_then(|c| row.get(c).copied())
                    .unwrap_or(factor.default);
                factor.normalize(value) * factor.weight
            })
            .sum();

        raw.clamp(self.rules.floor, self.rules.ceiling)
    }

    pub fn missing_features(&self) -> Vec<&str> {
        self.rules
            .factors
            .iter()
            .zip(&self.columns)
            .filter(|(_, c)| c.is_none())
            .map(|(f, _)| f.feature.as_str())
            .collect()
    }
}
