//! Injury risk scoring core
//!
//! Batch inference over a versioned injury-risk model with results
//! published to an object store, plus read-only diagnostics for the
//! statistics snapshot the model is trained from.

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod logic;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
