//! Error handling

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failure of one invocation stage.
///
/// The invocation handler collapses every variant into the same failure
/// response; the variant only decides the log line and the message prefix.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Artifact missing, corrupt, incompatible, or store unavailable
    #[error("Load failure for '{key}': {reason}")]
    Load { key: String, reason: String },

    /// Feature rows, scaler, model and schema disagree on layout
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Scaling or scoring raised
    #[error("Inference failure: {0}")]
    Inference(String),

    /// Store write raised
    #[error("Publish failure for '{key}': {reason}")]
    Publish { key: String, reason: String },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn load(key: &str, reason: impl ToString) -> Self {
        PipelineError::Load {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn publish(key: &str, reason: impl ToString) -> Self {
        PipelineError::Publish {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Load { .. } => "load_failure",
            PipelineError::SchemaMismatch(_) => "schema_mismatch",
            PipelineError::Inference(_) => "inference_failure",
            PipelineError::Publish { .. } => "publish_failure",
            PipelineError::Config(_) => "config_error",
        }
    }
}
