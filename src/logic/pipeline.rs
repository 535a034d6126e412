//! Pipeline - one batch invocation
//!
//! Loader → Feature Builder → Scorer → Publisher, sequential and
//! synchronous. Artifacts live only for the duration of `run`.

use chrono::{DateTime, Utc};

use crate::config::{FeatureSourceKind, PipelineConfig, ScorerKind};
use crate::error::PipelineResult;
use crate::logic::artifacts::{ArtifactLoader, ModelVersion};
use crate::logic::features::{FeatureSource, Roster, StaticSource, SyntheticSource};
use crate::logic::model::{HeuristicRules, RiskLevel};
use crate::logic::publish::{PublishReceipt, Publisher};
use crate::logic::scoring::{assess_batch, HeuristicScorer, ModelScorer, PredictionResult, RiskScorer};
use crate::logic::store::ObjectStore;

/// Outcome of a successful invocation
#[derive(Debug, Clone)]
pub struct InvocationSummary {
    /// `model` or `heuristic`
    pub method: &'static str,
    pub feature_source: &'static str,
    pub model_version: Option<ModelVersion>,
    pub results: Vec<PredictionResult>,
    pub receipt: PublishReceipt,
    pub timestamp: DateTime<Utc>,
}

impl InvocationSummary {
    pub fn predictions_made(&self) -> usize {
        self.results.len()
    }

    /// Results bucketed High or Critical
    pub fn high_risk_players(&self) -> usize {
        self.results.iter().filter(|r| r.risk_level.is_high_risk()).count()
    }

    pub fn flagged_players(&self) -> usize {
        self.results.iter().filter(|r| r.is_flagged()).count()
    }

    pub fn level_counts(&self) -> Vec<(RiskLevel, usize)> {
        RiskLevel::ALL
            .iter()
            .map(|&level| {
                let n = self.results.iter().filter(|r| r.risk_level == level).count();
                (level, n)
            })
            .collect()
    }
}

pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    store: &'a dyn ObjectStore,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PipelineConfig, store: &'a dyn ObjectStore) -> Self {
        Self { config, store }
    }

    fn loader(&self) -> ArtifactLoader<'a> {
        ArtifactLoader::new(self.store, self.config.artifact_keys()).with_retry(self.config.retry.clone())
    }

    fn scorer(&self) -> PipelineResult<(Box<dyn RiskScorer>, Option<ModelVersion>)> {
        match self.config.scorer {
            ScorerKind::Model => {
                let scorer = ModelScorer::from_bundle(self.loader().load_bundle()?);
                let version = scorer.version().clone();
                log::info!("Loaded {} model {}", scorer.model_kind(), version.label());
                Ok((Box::new(scorer), Some(version)))
            }
            ScorerKind::Heuristic => {
                log::warn!("Scoring with heuristic rules, not a trained model");
                let schema = self.loader().load_schema()?;
                let scorer = HeuristicScorer::new(schema, &HeuristicRules::default())?;
                Ok((Box::new(scorer), None))
            }
        }
    }

    fn feature_source(&self) -> PipelineResult<Box<dyn FeatureSource>> {
        match self.config.feature_source {
            FeatureSourceKind::Synthetic => {
                let roster = match &self.config.roster_path {
                    Some(path) => Roster::load(path)?,
                    None => Roster::sample(),
                };
                Ok(Box::new(SyntheticSource::new(roster, self.config.random_seed)))
            }
            FeatureSourceKind::Static => Ok(Box::new(StaticSource::new())),
        }
    }

    pub fn run(&self) -> PipelineResult<InvocationSummary> {
        self.run_at(Utc::now())
    }

    /// Run with an explicit invocation time (keys and dates derive from it)
    pub fn run_at(&self, now: DateTime<Utc>) -> PipelineResult<InvocationSummary> {
        let policy = self.config.policy()?;

        let (scorer, model_version) = self.scorer()?;
        let source = self.feature_source()?;

        let batch = source.build(scorer.schema())?;
        log::info!(
            "Scoring {} subjects ({} features, {} source) with {} scorer",
            batch.len(),
            scorer.schema().len(),
            source.name(),
            scorer.method()
        );

        let probabilities = scorer.score(&batch)?;
        let results = assess_batch(&batch, &probabilities, &policy, now.date_naive())?;

        let receipt = Publisher::new(self.store)
            .with_prefix(&self.config.predictions_prefix)
            .with_retry(self.config.retry.clone())
            .verify_writes(self.config.verify_writes)
            .publish(&results, now)?;

        let summary = InvocationSummary {
            method: scorer.method(),
            feature_source: source.name(),
            model_version,
            results,
            receipt,
            timestamp: now,
        };

        log::info!(
            "Predictions completed. {} of {} players high-risk, {} flagged",
            summary.high_risk_players(),
            summary.predictions_made(),
            summary.flagged_players()
        );
        let histogram: Vec<String> = summary
            .level_counts()
            .iter()
            .map(|(level, n)| format!("{}={}", level, n))
            .collect();
        log::info!("Risk levels: {}", histogram.join(" "));

        Ok(summary)
    }
}
