use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logic::pipeline::InvocationSummary;
use crate::logic::scoring::PredictionResult;

pub const SUCCESS_MESSAGE: &str = "Predictions completed successfully";
pub const FAILURE_MESSAGE: &str = "Prediction failed";

/// Trigger response; `body` is itself a JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessBody {
    pub message: String,
    pub predictions_made: usize,
    /// RFC 3339
    pub timestamp: String,
    pub high_risk_players: usize,
    /// At or above the decision threshold
    pub flagged_players: usize,
    pub risk_levels: BTreeMap<String, usize>,
    pub sample_predictions: Vec<PredictionResult>,
    /// `model` or `heuristic`
    pub scoring_method: String,
    /// `synthetic` or `static`
    pub feature_source: String,
    pub model_version: Option<String>,
    pub predictions_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureBody {
    pub error: String,
    pub message: String,
}

impl SuccessBody {
    pub fn from_summary(summary: &InvocationSummary, sample_size: usize) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            predictions_made: summary.predictions_made(),
            timestamp: summary.timestamp.to_rfc3339(),
            high_risk_players: summary.high_risk_players(),
            flagged_players: summary.flagged_players(),
            risk_levels: summary
                .level_counts()
                .into_iter()
                .map(|(level, n)| (level.as_str().to_string(), n))
                .collect(),
            sample_predictions: summary.results.iter().take(sample_size).cloned().collect(),
            scoring_method: summary.method.to_string(),
            feature_source: summary.feature_source.to_string(),
            model_version: summary.model_version.as_ref().map(|v| v.label()),
            predictions_key: summary.receipt.timestamped_key.clone(),
        }
    }
}

impl InvocationResponse {
    pub fn success(body: &SuccessBody) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self {
                status_code: 200,
                body,
            },
            Err(e) => Self::failure(&format!("serializing response: {}", e)),
        }
    }

    pub fn failure(error: &str) -> Self {
        let body = FailureBody {
            error: error.to_string(),
            message: FAILURE_MESSAGE.to_string(),
        };
        let body = serde_json::to_string(&body).unwrap_or_else(|_| {
            format!("{{\"error\": \"\", \"message\": \"{}\"}}", FAILURE_MESSAGE)
        });
        Self {
            status_code: 500,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
