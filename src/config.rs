//! Configuration module
//!
//! Resolution order: defaults, then an optional TOML file, then
//! `INJURY_RISK_*` environment variables (a `.env` file is honoured).

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{PipelineError, PipelineResult};
use crate::logic::artifacts::ArtifactKeys;
use crate::logic::model::RiskPolicy;
use crate::logic::store::{HttpStore, LocalStore, MemoryStore, ObjectStore, RetryPolicy};

// ============================================================================
// STRATEGY SELECTORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSourceKind {
    Synthetic,
    Static,
}

impl FromStr for FeatureSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "synthetic" => Ok(FeatureSourceKind::Synthetic),
            "static" => Ok(FeatureSourceKind::Static),
            other => Err(format!("unknown feature source '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    Model,
    Heuristic,
}

impl FromStr for ScorerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "model" => Ok(ScorerKind::Model),
            "heuristic" => Ok(ScorerKind::Heuristic),
            other => Err(format!("unknown scorer '{}'", other)),
        }
    }
}

// ============================================================================
// STORE BACKEND
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Directory tree; `root` defaults to the per-user data directory
    Local {
        #[serde(default)]
        root: Option<PathBuf>,
    },
    Http {
        base_url: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    /// Empty in-process store (dry runs)
    Memory,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Local { root: None }
    }
}

// ============================================================================
// PIPELINE CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub store_namespace: String,
    pub model_key: String,
    pub scaler_key: String,
    pub schema_key: String,
    pub predictions_prefix: String,

    pub decision_threshold: f64,
    pub bucket_edges: [f64; 3],

    pub random_seed: u64,
    pub feature_source: FeatureSourceKind,
    pub scorer: ScorerKind,
    /// JSON roster for the synthetic source; sample players when unset
    pub roster_path: Option<PathBuf>,

    pub store: StoreConfig,
    pub retry: RetryPolicy,

    /// Results echoed back in the response body
    pub sample_size: usize,
    pub verify_writes: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            store_namespace: DEFAULT_NAMESPACE.to_string(),
            model_key: DEFAULT_MODEL_KEY.to_string(),
            scaler_key: DEFAULT_SCALER_KEY.to_string(),
            schema_key: DEFAULT_SCHEMA_KEY.to_string(),
            predictions_prefix: DEFAULT_PREDICTIONS_PREFIX.to_string(),
            decision_threshold: DEFAULT_DECISION_THRESHOLD,
            bucket_edges: DEFAULT_BUCKET_EDGES,
            random_seed: DEFAULT_RANDOM_SEED,
            feature_source: FeatureSourceKind::Synthetic,
            scorer: ScorerKind::Model,
            roster_path: None,
            store: StoreConfig::default(),
            retry: RetryPolicy::default(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            verify_writes: false,
        }
    }
}

fn parse_env<T: FromStr>(name: &str, raw: &str) -> PipelineResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| PipelineError::Config(format!("{}={}: {}", name, raw, e)))
}

fn parse_edges(raw: &str) -> PipelineResult<[f64; 3]> {
    let values: Vec<f64> = raw
        .split(',')
        .map(|part| parse_env(ENV_BUCKET_EDGES, part))
        .collect::<PipelineResult<_>>()?;
    match values.as_slice() {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => Err(PipelineError::Config(format!(
            "{} needs three comma-separated edges, got '{}'",
            ENV_BUCKET_EDGES, raw
        ))),
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        toml::from_str(text).map_err(|e| PipelineError::Config(format!("invalid config file: {}", e)))
    }

    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> PipelineResult<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", env_file.display());
        }

        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    PipelineError::Config(format!("reading {}: {}", path.display(), e))
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `INJURY_RISK_*` variables returned by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> PipelineResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_NAMESPACE) {
            self.store_namespace = v;
        }
        if let Some(v) = lookup(ENV_MODEL_KEY) {
            self.model_key = v;
        }
        if let Some(v) = lookup(ENV_SCALER_KEY) {
            self.scaler_key = v;
        }
        if let Some(v) = lookup(ENV_SCHEMA_KEY) {
            self.schema_key = v;
        }
        if let Some(v) = lookup(ENV_DECISION_THRESHOLD) {
            self.decision_threshold = parse_env(ENV_DECISION_THRESHOLD, &v)?;
        }
        if let Some(v) = lookup(ENV_BUCKET_EDGES) {
            self.bucket_edges = parse_edges(&v)?;
        }
        if let Some(v) = lookup(ENV_RANDOM_SEED) {
            self.random_seed = parse_env(ENV_RANDOM_SEED, &v)?;
        }
        if let Some(v) = lookup(ENV_FEATURE_SOURCE) {
            self.feature_source = v.parse().map_err(PipelineError::Config)?;
        }
        if let Some(v) = lookup(ENV_SCORER) {
            self.scorer = v.parse().map_err(PipelineError::Config)?;
        }

        // A URL wins over a root; the token only applies to HTTP
        if let Some(url) = lookup(ENV_STORE_URL) {
            self.store = StoreConfig::Http {
                base_url: url,
                token: lookup(ENV_STORE_TOKEN),
                timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            };
        } else if let Some(root) = lookup(ENV_STORE_ROOT) {
            self.store = StoreConfig::Local {
                root: Some(PathBuf::from(root)),
            };
        } else if let (Some(token), StoreConfig::Http { token: slot, .. }) =
            (lookup(ENV_STORE_TOKEN), &mut self.store)
        {
            *slot = Some(token);
        }

        Ok(())
    }

    pub fn validate(&self) -> PipelineResult<()> {
        self.policy()?;
        if self.store_namespace.trim().is_empty() {
            return Err(PipelineError::Config("store namespace is empty".to_string()));
        }
        for (field, key) in [
            ("model_key", &self.model_key),
            ("scaler_key", &self.scaler_key),
            ("schema_key", &self.schema_key),
        ] {
            crate::logic::store::validate_key(key)
                .map_err(|e| PipelineError::Config(format!("{}: {}", field, e)))?;
        }
        if let StoreConfig::Http { base_url, .. } = &self.store {
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(PipelineError::Config(format!(
                    "store url '{}' must be http(s)",
                    base_url
                )));
            }
        }
        Ok(())
    }

    pub fn policy(&self) -> PipelineResult<RiskPolicy> {
        RiskPolicy::new(self.decision_threshold, self.bucket_edges).map_err(PipelineError::Config)
    }

    pub fn artifact_keys(&self) -> ArtifactKeys {
        ArtifactKeys {
            model: self.model_key.clone(),
            scaler: self.scaler_key.clone(),
            schema: self.schema_key.clone(),
        }
    }

    pub fn open_store(&self) -> Box<dyn ObjectStore> {
        match &self.store {
            StoreConfig::Local { root } => {
                let root = root.clone().unwrap_or_else(LocalStore::default_root);
                Box::new(LocalStore::new(root, &self.store_namespace))
            }
            StoreConfig::Http {
                base_url,
                token,
                timeout_secs,
            } => Box::new(HttpStore::new(
                base_url,
                &self.store_namespace,
                token.clone(),
                Duration::from_secs(*timeout_secs),
            )),
            StoreConfig::Memory => Box::new(MemoryStore::new()),
        }
    }
}
