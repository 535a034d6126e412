//! ONNX Runtime model
//!
//! Loads a converted classifier graph from memory. The graph takes one
//! `[rows, features]` f32 input; the probability output is the one whose
//! name contains "prob", or the last output otherwise. A `[rows, 2]` output
//! yields column 1, a `[rows]` or `[rows, 1]` output is used as-is.

use ndarray::{Array2, ArrayView2};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::{InferenceError, RiskModel};
use crate::logic::artifacts::ArtifactError;

pub struct OnnxModel {
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxModel {
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, ArtifactError> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| ArtifactError::Invalid(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ArtifactError::Invalid(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| ArtifactError::Invalid(format!("Load from memory error: {}", e)))?;

        let names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let output_name = names
            .iter()
            .find(|n| n.to_lowercase().contains("prob"))
            .or_else(|| names.last())
            .cloned()
            .ok_or_else(|| ArtifactError::Invalid("ONNX graph defines no outputs".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl RiskModel for OnnxModel {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn n_features(&self) -> Option<usize> {
        None
    }

    fn predict_proba(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<f64>, InferenceError> {
        let rows = batch.nrows();
        let input: Array2<f32> = batch.mapv(|v| v as f32);

        let input_tensor = Value::from_array(input)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| InferenceError(format!("No output '{}'", self.output_name)))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

        if rows == 0 {
            return Ok(Vec::new());
        }

        match data.len() / rows {
            1 if data.len() == rows => Ok(data.iter().map(|p| *p as f64).collect()),
            2 if data.len() == rows * 2 => Ok(data.chunks(2).map(|pair| pair[1] as f64).collect()),
            _ => Err(InferenceError(format!(
                "unexpected output size {} for {} rows",
                data.len(),
                rows
            ))),
        }
    }
}
