//! Decision Threshold & Risk Buckets
//!
//! Two conventions exist for the binary cutoff and bucket edges: the model
//! path used 0.2 with edges 0.1/0.3/0.5, the rule-based path 0.5 with edges
//! 0.2/0.3/0.5. Both are available as presets. The default is a policy
//! choice: edges 0.1/0.3/0.5 with the flag raised at the Critical edge.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BUCKET_EDGES, DEFAULT_DECISION_THRESHOLD};

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Ordered, exhaustive partition of [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    /// High and Critical count as high-risk in the response summary
    pub fn is_high_risk(&self) -> bool {
        *self >= RiskLevel::High
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Flag raised when probability >= threshold
    pub decision_threshold: f64,
    /// Lower edges of Medium, High, Critical. Buckets are [lo, hi) except
    /// Critical, which is closed at 1.0.
    pub bucket_edges: [f64; 3],
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            decision_threshold: DEFAULT_DECISION_THRESHOLD,
            bucket_edges: DEFAULT_BUCKET_EDGES,
        }
    }
}

impl RiskPolicy {
    pub fn new(decision_threshold: f64, bucket_edges: [f64; 3]) -> Result<Self, String> {
        let policy = Self {
            decision_threshold,
            bucket_edges,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Convention of the trained-model path
    pub fn model_variant() -> Self {
        Self {
            decision_threshold: 0.2,
            bucket_edges: [0.1, 0.3, 0.5],
        }
    }

    /// Convention of the rule-based path
    pub fn heuristic_variant() -> Self {
        Self {
            decision_threshold: 0.5,
            bucket_edges: [0.2, 0.3, 0.5],
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.decision_threshold) {
            return Err(format!(
                "decision threshold {} outside [0, 1]",
                self.decision_threshold
            ));
        }
        let [a, b, c] = self.bucket_edges;
        let inside = |e: f64| e > 0.0 && e < 1.0;
        if !(inside(a) && inside(b) && inside(c) && a < b && b < c) {
            return Err(format!(
                "bucket edges {:?} must be strictly increasing inside (0, 1)",
                self.bucket_edges
            ));
        }
        Ok(())
    }

    pub fn level(&self, probability: f64) -> RiskLevel {
        let [medium, high, critical] = self.bucket_edges;
        if probability < medium {
            RiskLevel::Low
        } else if probability < high {
            RiskLevel::Medium
        } else if probability < critical {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn is_flagged(&self, probability: f64) -> bool {
        probability >= self.decision_threshold
    }

    /// Binary flag and bucket for one probability
    pub fn assess(&self, probability: f64) -> (bool, RiskLevel) {
        (self.is_flagged(probability), self.level(probability))
    }
}
