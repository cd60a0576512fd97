//! ONNX classifier (feature `onnx`)
//!
//! Runs an exported binary classifier through ONNX Runtime. Only the
//! probability capability is available; coefficients are not recoverable
//! from the graph.

use ndarray::{Array2, ArrayView2};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::{ModelError, ModelKind, PredictProba, RiskModel};
use crate::logic::features::FEATURE_COUNT;

/// Preferred output name of exported classifiers
const PROBABILITY_OUTPUT: &str = "probabilities";

/// ONNX session wrapper; the session needs `&mut` to run
pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_name: String,
}

fn backend<E: std::fmt::Display>(e: E) -> ModelError {
    ModelError::Backend(e.to_string())
}

impl OnnxClassifier {
    /// Build a session from model bytes
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, ModelError> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(backend)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(backend)?
            .commit_from_memory(model_bytes)
            .map_err(backend)?;

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == PROBABILITY_OUTPUT)
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelError::Backend("No output defined".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl PredictProba for OnnxClassifier {
    fn predict_proba(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
        if features.ncols() != FEATURE_COUNT {
            return Err(ModelError::FeatureCount {
                expected: FEATURE_COUNT,
                got: features.ncols(),
            });
        }

        let n = features.nrows();
        let input = features.mapv(|v| v as f32);
        let input_tensor = Value::from_array(input).map_err(backend)?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor]).map_err(backend)?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| ModelError::Backend("No output".to_string()))?;
        let data = output.try_extract_tensor::<f32>().map_err(backend)?.1;

        if data.len() != n * 2 {
            return Err(ModelError::OutputShape {
                rows: n,
                cols: if n == 0 { 0 } else { data.len() / n },
                expected_rows: n,
            });
        }

        Ok(Array2::from_shape_fn((n, 2), |(i, j)| f64::from(data[i * 2 + j])))
    }
}

impl RiskModel for OnnxClassifier {
    fn kind(&self) -> ModelKind {
        ModelKind::Onnx
    }
}
