//! Artifact Loader
//!
//! Fetches the three artifacts, deserializes them and checks they agree on
//! feature count. Every fetch or decode problem is a `Load` failure naming
//! the key; disagreement between artifacts is a `SchemaMismatch`.

use serde::{Deserialize, Serialize};

use super::{FeatureSchema, ModelVersion, Scaler};
use crate::constants::{DEFAULT_MODEL_KEY, DEFAULT_SCALER_KEY, DEFAULT_SCHEMA_KEY};
use crate::error::{PipelineError, PipelineResult};
use crate::logic::model::{decode_model, RiskModel};
use crate::logic::store::{with_retry, ObjectStore, RetryPolicy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactKeys {
    pub model: String,
    pub scaler: String,
    pub schema: String,
}

impl Default for ArtifactKeys {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL_KEY.to_string(),
            scaler: DEFAULT_SCALER_KEY.to_string(),
            schema: DEFAULT_SCHEMA_KEY.to_string(),
        }
    }
}

/// Everything one invocation needs to score; dropped when it ends
pub struct ArtifactBundle {
    pub model: Box<dyn RiskModel>,
    pub scaler: Scaler,
    pub schema: FeatureSchema,
    pub version: ModelVersion,
}

pub struct ArtifactLoader<'a> {
    store: &'a dyn ObjectStore,
    keys: ArtifactKeys,
    retry: RetryPolicy,
}

impl<'a> ArtifactLoader<'a> {
    pub fn new(store: &'a dyn ObjectStore, keys: ArtifactKeys) -> Self {
        Self {
            store,
            keys,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn keys(&self) -> &ArtifactKeys {
        &self.keys
    }

    fn fetch(&self, key: &str) -> PipelineResult<Vec<u8>> {
        let what = format!("fetch {}", key);
        let bytes = with_retry(&self.retry, &what, || self.store.get(key))
            .map_err(|e| PipelineError::load(key, e))?;
        log::debug!("Fetched {} ({} bytes)", key, bytes.len());
        Ok(bytes)
    }

    pub fn load_schema(&self) -> PipelineResult<FeatureSchema> {
        let key = &self.keys.schema;
        let schema = FeatureSchema::from_json(&self.fetch(key)?)
            .map_err(|e| PipelineError::load(key, e))?;
        log::info!("Feature schema loaded: {} features (hash {:08x})", schema.len(), schema.layout_hash());
        Ok(schema)
    }

    pub fn load_scaler(&self) -> PipelineResult<Scaler> {
        let key = &self.keys.scaler;
        Scaler::from_json(&self.fetch(key)?).map_err(|e| PipelineError::load(key, e))
    }

    pub fn load_model(&self) -> PipelineResult<(Box<dyn RiskModel>, ModelVersion)> {
        let key = &self.keys.model;
        let blob = self.fetch(key)?;
        let version = ModelVersion::from_blob(key, &blob);
        let model = decode_model(&blob).map_err(|e| PipelineError::load(key, e))?;
        Ok((model, version))
    }

    /// Load model, scaler and schema, and check they are mutually compatible
    pub fn load_bundle(&self) -> PipelineResult<ArtifactBundle> {
        log::info!("Loading model artifacts from {}...", self.store.describe());

        let schema = self.load_schema()?;
        let scaler = self.load_scaler()?;
        let (model, version) = self.load_model()?;

        check_compatible(&schema, &scaler, model.as_ref())?;

        log::info!(
            "Model loaded successfully: {} v{} ({} features)",
            model.kind(),
            version.label(),
            schema.len()
        );

        Ok(ArtifactBundle {
            model,
            scaler,
            schema,
            version,
        })
    }
}

pub fn check_compatible(
    schema: &FeatureSchema,
    scaler: &Scaler,
    model: &dyn RiskModel,
) -> PipelineResult<()> {
    if scaler.len() != schema.len() {
        return Err(PipelineError::SchemaMismatch(format!(
            "scaler has {} features, schema has {}",
            scaler.len(),
            schema.len()
        )));
    }

    if let Some(names) = scaler.feature_names() {
        if names != schema.names() {
            return Err(PipelineError::SchemaMismatch(
                "scaler feature names differ from schema order".to_string(),
            ));
        }
    }

    if let Some(n) = model.n_features() {
        if n != schema.len() {
            return Err(PipelineError::SchemaMismatch(format!(
                "model expects {} features, schema has {}",
                n,
                schema.len()
            )));
        }
    }

    Ok(())
}
