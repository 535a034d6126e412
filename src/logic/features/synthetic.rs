//! Synthetic feature generation
//!
//! Feature values are drawn from a distribution chosen by the first pattern
//! in the table whose needle occurs in the feature name, case-insensitively.
//! Order matters: `age` is checked first, so `usage_rate` and
//! `average_points` draw an age. A single seeded RNG is consumed row-major
//! (subject, then feature):
//! the same seed, schema and roster always produce the same batch.

use once_cell::sync::Lazy;
use rand::{rngs::StdRng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::sampling::{exponential, gaussian};
use super::{FeatureBatch, FeatureSource, Roster, Subject};
use crate::constants::DEFAULT_RANDOM_SEED;
use crate::error::{PipelineError, PipelineResult};
use crate::logic::artifacts::FeatureSchema;

// ============================================================================
// DISTRIBUTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// The subject's age plus N(0, jitter)
    SubjectAge { jitter: f64 },
    Normal { mean: f64, std_dev: f64 },
    Exponential { mean: f64 },
    StandardNormal,
}

impl Distribution {
    pub fn sample(&self, subject: &Subject, rng: &mut StdRng) -> f64 {
        match *self {
            Distribution::SubjectAge { jitter } => subject.age_or_default() + gaussian(0.0, jitter, rng),
            Distribution::Normal { mean, std_dev } => gaussian(mean, std_dev, rng),
            Distribution::Exponential { mean } => exponential(mean, rng),
            Distribution::StandardNormal => gaussian(0.0, 1.0, rng),
        }
    }
}

// ============================================================================
// PATTERN TABLE
// ============================================================================

#[derive(Debug, Clone)]
struct PatternRule {
    needles: Vec<String>,
    pattern: Regex,
    distribution: Distribution,
}

/// Ordered `(pattern, distribution)` pairs; first match wins
#[derive(Debug, Clone)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
    fallback: Distribution,
}

static STANDARD_PATTERNS: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::new(Distribution::StandardNormal)
        .rule(&["age"], Distribution::SubjectAge { jitter: 2.0 })
        .and_then(|t| t.rule(&["minutes"], Distribution::Normal { mean: 30.0, std_dev: 8.0 }))
        .and_then(|t| t.rule(&["games"], Distribution::Normal { mean: 65.0, std_dev: 10.0 }))
        .and_then(|t| t.rule(&["rest"], Distribution::Exponential { mean: 2.0 }))
        .and_then(|t| t.rule(&["usage", "rate"], Distribution::Normal { mean: 0.25, std_dev: 0.05 }))
        .expect("standard feature patterns are valid")
});

impl PatternTable {
    pub fn new(fallback: Distribution) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Default table: age, minutes, games, rest, usage/rate, else N(0, 1)
    pub fn standard() -> Self {
        STANDARD_PATTERNS.clone()
    }

    /// Append a rule matching names that contain any of `needles`
    pub fn rule(mut self, needles: &[&str], distribution: Distribution) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = needles.iter().map(|n| regex::escape(n)).collect();
        let pattern = Regex::new(&format!("(?i)(?:{})", alternatives.join("|")))?;
        self.rules.push(PatternRule {
            needles: needles.iter().map(|n| n.to_string()).collect(),
            pattern,
            distribution,
        });
        Ok(self)
    }

    pub fn distribution_for(&self, feature: &str) -> Distribution {
        self.rules
            .iter()
            .find(|r| r.pattern.is_match(feature))
            .map(|r| r.distribution)
            .unwrap_or(self.fallback)
    }

    /// Needles of the rule that claims `feature`, if any
    pub fn matched_needles(&self, feature: &str) -> Option<&[String]> {
        self.rules
            .iter()
            .find(|r| r.pattern.is_match(feature))
            .map(|r| r.needles.as_slice())
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// SOURCE
// ============================================================================

pub struct SyntheticSource {
    roster: Roster,
    seed: u64,
    patterns: PatternTable,
}

impl SyntheticSource {
    pub fn new(roster: Roster, seed: u64) -> Self {
        Self {
            roster,
            seed,
            patterns: PatternTable::standard(),
        }
    }

    pub fn with_patterns(mut self, patterns: PatternTable) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(Roster::sample(), DEFAULT_RANDOM_SEED)
    }
}

impl FeatureSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn build(&self, schema: &FeatureSchema) -> PipelineResult<FeatureBatch> {
        let subjects = self.roster.subjects().to_vec();
        if subjects.is_empty() {
            return Err(PipelineError::Config("roster is empty".to_string()));
        }

        let plan: Vec<Distribution> = schema
            .names()
            .iter()
            .map(|name| self.patterns.distribution_for(name))
            .collect();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let rows: Vec<Vec<f64>> = subjects
            .iter()
            .map(|subject| plan.iter().map(|d| d.sample(subject, &mut rng)).collect())
            .collect();

        log::info!(
            "Generated synthetic features: {} subjects x {} features (seed {})",
            subjects.len(),
            schema.len(),
            self.seed
        );

        FeatureBatch::from_rows(schema, subjects, rows)
    }
}
