//! Artifacts Module - Model, scaler and feature schema
//!
//! Artifacts are produced by the (external) training job and are read-only
//! here. The three must agree on feature count and order; `loader` checks
//! that before anything is scored.

pub mod loader;
pub mod scaler;
pub mod schema;
pub mod version;

#[cfg(test)]
mod tests;

pub use loader::{ArtifactBundle, ArtifactKeys, ArtifactLoader};
pub use scaler::Scaler;
pub use schema::FeatureSchema;
pub use version::ModelVersion;

use thiserror::Error;

/// Why an artifact payload could not be turned into an in-memory object
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid artifact: {0}")]
    Invalid(String),

    #[error("unsupported model format: {0}")]
    Unsupported(String),
}
