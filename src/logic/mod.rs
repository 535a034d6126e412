//! Logic Module - Inference pipeline & dataset diagnostics
//!
//! ## Layout
//! - `store/` - namespaced object store (local, HTTP, in-memory) with retry
//! - `artifacts/` - model, scaler and feature schema loading
//! - `features/` - feature layout and the synthetic / static sources
//! - `model/` - classifiers, heuristic rules, threshold & risk buckets
//! - `scoring/` - scorers and prediction results
//! - `publish/` - CSV publishing (timestamped, then latest)
//! - `pipeline` - one invocation end to end
//! - `diagnostics/` - read-only SQLite dataset reports

pub mod artifacts;
pub mod diagnostics;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod scoring;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;
