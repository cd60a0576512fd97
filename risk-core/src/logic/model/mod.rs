//! Model Module - Risk probability models
//!
//! A model exposes two capabilities:
//! - `PredictProba` (required): per-row class probabilities
//! - `LinearCoefficients` (optional): one coefficient per feature,
//!   queried through `RiskModel::linear()`
//!
//! When no artifact loads, scoring falls back to the closed-form
//! logistic formula in `fallback`.

pub mod fallback;
pub mod loader;
pub mod pipeline;
pub mod threshold;

#[cfg(feature = "onnx")]
pub mod onnx;

use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

// Re-export common types
pub use fallback::{fallback_probability, sigmoid, FALLBACK_COEFFICIENTS, FALLBACK_INTERCEPT};
pub use loader::{load_model, AbsentReason, ModelLoad, ModelMetadata};
pub use pipeline::LogisticPipeline;
pub use threshold::{label, RiskLabel, ThresholdConfig};

/// Index of the positive ("À risque") class in probability outputs
pub const POSITIVE_CLASS: usize = 1;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Failure of a model capability call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("model expected {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },

    #[error("model returned shape {rows}x{cols}, expected {expected_rows}x2")]
    OutputShape { rows: usize, cols: usize, expected_rows: usize },

    #[error("model returned invalid probability {value} at row {row}")]
    InvalidProbability { row: usize, value: f64 },

    #[error("inference failed: {0}")]
    Backend(String),
}

// ============================================================================
// CAPABILITIES
// ============================================================================

/// Required capability: class probabilities for an n×5 feature matrix
///
/// Returns an n×2 matrix; column 0 is "Stable", column 1 is "À risque".
pub trait PredictProba: Send + Sync {
    fn predict_proba(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError>;
}

/// Optional capability: fitted linear stage, coefficients in layout order
pub trait LinearCoefficients {
    fn coefficients(&self) -> Vec<f64>;
    fn intercept(&self) -> f64;
}

/// Kind of loaded artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticPipeline,
    Onnx,
}

/// A trained classifier held read-only for the process lifetime
pub trait RiskModel: PredictProba {
    fn kind(&self) -> ModelKind;

    /// Capability check for the linear stage
    fn linear(&self) -> Option<&dyn LinearCoefficients> {
        None
    }
}

/// Shared read-only model handle
pub type ModelHandle = Arc<dyn RiskModel>;

/// Positive-class probability per row, with shape and value checks
pub fn positive_class<M: PredictProba + ?Sized>(
    model: &M,
    features: ArrayView2<'_, f64>,
) -> Result<Array1<f64>, ModelError> {
    let n = features.nrows();
    let proba = model.predict_proba(features)?;

    if proba.nrows() != n || proba.ncols() <= POSITIVE_CLASS {
        return Err(ModelError::OutputShape {
            rows: proba.nrows(),
            cols: proba.ncols(),
            expected_rows: n,
        });
    }

    let positive = proba.column(POSITIVE_CLASS).to_owned();
    if let Some((row, &value)) = positive
        .iter()
        .enumerate()
        .find(|(_, p)| !(0.0..=1.0).contains(*p))
    {
        return Err(ModelError::InvalidProbability { row, value });
    }

    Ok(positive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    struct Constant(f64);

    impl PredictProba for Constant {
        fn predict_proba(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
            let n = features.nrows();
            Ok(Array2::from_shape_fn((n, 2), |(_, j)| if j == 1 { self.0 } else { 1.0 - self.0 }))
        }
    }

    struct OneColumn;

    impl PredictProba for OneColumn {
        fn predict_proba(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
            Ok(Array2::zeros((features.nrows(), 1)))
        }
    }

    #[test]
    fn test_positive_class_takes_second_column() {
        let x = array![[3.0, 1.0, 7.0, 40.0, 0.0], [1.0, 0.0, 9.0, 30.0, 0.0]];
        let p = positive_class(&Constant(0.25), x.view()).unwrap();
        assert_eq!(p.to_vec(), vec![0.25, 0.25]);
    }

    #[test]
    fn test_positive_class_rejects_bad_output() {
        let x = array![[3.0, 1.0, 7.0, 40.0, 0.0]];
        assert!(matches!(
            positive_class(&OneColumn, x.view()),
            Err(ModelError::OutputShape { .. })
        ));
        assert!(matches!(
            positive_class(&Constant(1.5), x.view()),
            Err(ModelError::InvalidProbability { row: 0, .. })
        ));
        assert!(matches!(
            positive_class(&Constant(f64::NAN), x.view()),
            Err(ModelError::InvalidProbability { .. })
        ));
    }
}
