use crate::error::{PipelineError, PipelineResult};
use crate::logic::artifacts::{ArtifactBundle, FeatureSchema, ModelVersion};
use crate::logic::features::FeatureBatch;
use crate::logic::model::heuristic::BoundHeuristic;
use crate::logic::model::HeuristicRules;

// ============================================================================
// SCORER TRAIT
// ============================================================================

pub trait RiskScorer {
    /// `model` or `heuristic`; recorded with every invocation
    fn method(&self) -> &'static str;

    /// Schema feature batches must be built against
    fn schema(&self) -> &FeatureSchema;

    /// One probability in [0, 1] per subject, in batch order
    fn score(&self, batch: &FeatureBatch) -> PipelineResult<Vec<f64>>;
}

/// Reject short, non-finite or out-of-range model output
pub fn check_probabilities(probabilities: &[f64], expected: usize) -> PipelineResult<()> {
    if probabilities.len() != expected {
        return Err(PipelineError::Inference(format!(
            "model returned {} probabilities for {} rows",
            probabilities.len(),
            expected
        )));
    }

    if let Some((i, p)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p < 0.0 || **p > 1.0)
    {
        return Err(PipelineError::Inference(format!(
            "probability {} for row {} is outside [0, 1]",
            p, i
        )));
    }

    Ok(())
}

// ============================================================================
// MODEL SCORER
// ============================================================================

pub struct ModelScorer {
    bundle: ArtifactBundle,
}

impl ModelScorer {
    pub fn from_bundle(bundle: ArtifactBundle) -> Self {
        Self { bundle }
    }

    pub fn version(&self) -> &ModelVersion {
        &self.bundle.version
    }

    pub fn model_kind(&self) -> &'static str {
        self.bundle.model.kind()
    }
}

impl RiskScorer for ModelScorer {
    fn method(&self) -> &'static str {
        "model"
    }

    fn schema(&self) -> &FeatureSchema {
        &self.bundle.schema
    }

    fn score(&self, batch: &FeatureBatch) -> PipelineResult<Vec<f64>> {
        batch.validate_against(&self.bundle.schema)?;

        let scaled = self
            .bundle
            .scaler
            .transform(batch.values.view())
            .map_err(PipelineError::Inference)?;

        let probabilities = self
            .bundle
            .model
            .predict_proba(scaled.view())
            .map_err(|e| PipelineError::Inference(e.to_string()))?;

        check_probabilities(&probabilities, batch.len())?;
        Ok(probabilities)
    }
}

// ============================================================================
// HEURISTIC SCORER
// ============================================================================

/// Rule-based stand-in; its output is never presented as a model prediction
pub struct HeuristicScorer {
    schema: FeatureSchema,
    rules: BoundHeuristic,
}

impl HeuristicScorer {
    pub fn new(schema: FeatureSchema, rules: &HeuristicRules) -> PipelineResult<Self> {
        rules.validate().map_err(PipelineError::Config)?;
        let bound = rules.bind(&schema);
        Ok(Self {
            schema,
            rules: bound,
        })
    }

    pub fn missing_features(&self) -> Vec<&str> {
        self.rules.missing_features()
    }
}

impl RiskScorer for HeuristicScorer {
    fn method(&self) -> &'static str {
        "heuristic"
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn score(&self, batch: &FeatureBatch) -> PipelineResult<Vec<f64>> {
        batch.validate_against(&self.schema)?;

        let probabilities: Vec<f64> = batch
            .values
            .rows()
            .into_iter()
            .map(|row| self.rules.score(row))
            .collect();

        check_probabilities(&probabilities, batch.len())?;
        Ok(probabilities)
    }
}
