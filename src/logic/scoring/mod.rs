//! Scoring Module - Probabilities, flags and risk buckets
//!
//! A `RiskScorer` turns a feature batch into one probability per subject;
//! `assess_batch` applies the risk policy and stamps the invocation date.
//!
//! - `ModelScorer` - scaler + trained model from the artifact bundle
//! - `HeuristicScorer` - weighted rules on raw features, labelled `heuristic`

pub mod result;
pub mod scorer;

pub use result::{assess_batch, PredictionResult};
pub use scorer::{check_probabilities, HeuristicScorer, ModelScorer, RiskScorer};
