//! Logistic pipeline artifact (JSON)
//!
//! Mirrors a two-step scikit-learn pipeline: an optional standard scaler
//! followed by a logistic regression stored under the `clf` step.
//!
//! ```json
//! {
//!   "feature_version": 1,
//!   "layout_hash": 1234567890,
//!   "steps": {
//!     "scaler": { "mean": [3.0, 1.5, 6.0, 42.0, 0.3], "scale": [1.1, 1.2, 2.0, 11.0, 0.46] },
//!     "clf": { "coef": [0.8, 0.6, -0.5, 0.2, 0.3], "intercept": -0.4 }
//!   }
//! }
//! ```

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::fallback::sigmoid;
use super::{LinearCoefficients, ModelError, ModelKind, PredictProba, RiskModel};
use crate::logic::features::layout::{layout_hash, validate_layout, LayoutMismatchError, FEATURE_VERSION};
use crate::logic::features::FEATURE_COUNT;

/// Standardization stage: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Fitted binary logistic regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

/// Named pipeline steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSteps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScaler>,
    pub clf: LogisticRegression,
}

/// Serialized logistic pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticPipeline {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub steps: PipelineSteps,
}

/// Structural problem in an artifact
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArtifactError {
    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error("{stage}: expected {expected} values, got {got}")]
    Length { stage: &'static str, expected: usize, got: usize },

    #[error("{stage}: non-finite value")]
    NonFinite { stage: &'static str },

    #[error("scaler: zero scale for feature {0}")]
    ZeroScale(usize),
}

impl LogisticPipeline {
    /// Build a pipeline for the current feature layout
    pub fn new(scaler: Option<StandardScaler>, coef: Vec<f64>, intercept: f64) -> Self {
        Self {
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            steps: PipelineSteps {
                scaler,
                clf: LogisticRegression { coef, intercept },
            },
        }
    }

    /// Parse and check an artifact
    pub fn from_json(bytes: &[u8]) -> Result<Self, PipelineLoadError> {
        let pipeline: LogisticPipeline = serde_json::from_slice(bytes)?;
        pipeline.check()?;
        Ok(pipeline)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    /// Layout compatibility and per-stage shape checks
    pub fn check(&self) -> Result<(), ArtifactError> {
        validate_layout(self.feature_version, self.layout_hash)?;

        check_stage("clf.coef", &self.steps.clf.coef)?;
        if !self.steps.clf.intercept.is_finite() {
            return Err(ArtifactError::NonFinite { stage: "clf.intercept" });
        }

        if let Some(scaler) = &self.steps.scaler {
            check_stage("scaler.mean", &scaler.mean)?;
            check_stage("scaler.scale", &scaler.scale)?;
            if let Some(i) = scaler.scale.iter().position(|s| *s == 0.0) {
                return Err(ArtifactError::ZeroScale(i));
            }
        }

        Ok(())
    }

    fn logit(&self, row: ArrayView1<'_, f64>) -> f64 {
        let clf = &self.steps.clf;
        let mut z = clf.intercept;
        for (j, (&x, &c)) in row.iter().zip(clf.coef.iter()).enumerate() {
            let x = match &self.steps.scaler {
                Some(s) => (x - s.mean[j]) / s.scale[j],
                None => x,
            };
            z += c * x;
        }
        z
    }
}

fn check_stage(stage: &'static str, values: &[f64]) -> Result<(), ArtifactError> {
    if values.len() != FEATURE_COUNT {
        return Err(ArtifactError::Length {
            stage,
            expected: FEATURE_COUNT,
            got: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ArtifactError::NonFinite { stage });
    }
    Ok(())
}

/// Failure parsing a pipeline artifact
#[derive(Debug, thiserror::Error)]
pub enum PipelineLoadError {
    #[error("corrupt artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid artifact: {0}")]
    Invalid(#[from] ArtifactError),
}

impl PredictProba for LogisticPipeline {
    fn predict_proba(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
        if features.ncols() != FEATURE_COUNT {
            return Err(ModelError::FeatureCount {
                expected: FEATURE_COUNT,
                got: features.ncols(),
            });
        }

        let mut out = Array2::zeros((features.nrows(), 2));
        for (i, row) in features.rows().into_iter().enumerate() {
            let p = sigmoid(self.logit(row));
            out[[i, 0]] = 1.0 - p;
            out[[i, 1]] = p;
        }
        Ok(out)
    }
}

impl LinearCoefficients for LogisticPipeline {
    fn coefficients(&self) -> Vec<f64> {
        self.steps.clf.coef.clone()
    }

    fn intercept(&self) -> f64 {
        self.steps.clf.intercept
    }
}

impl RiskModel for LogisticPipeline {
    fn kind(&self) -> ModelKind {
        ModelKind::LogisticPipeline
    }

    fn linear(&self) -> Option<&dyn LinearCoefficients> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::fallback::{fallback_probability, FALLBACK_COEFFICIENTS, FALLBACK_INTERCEPT};
    use ndarray::array;

    fn fallback_as_pipeline() -> LogisticPipeline {
        LogisticPipeline::new(None, FALLBACK_COEFFICIENTS.to_vec(), FALLBACK_INTERCEPT)
    }

    #[test]
    fn test_unscaled_pipeline_matches_fallback() {
        let model = fallback_as_pipeline();
        let row = [4.0, 2.0, 3.0, 55.0, 1.0];
        let x = array![[4.0, 2.0, 3.0, 55.0, 1.0]];

        let proba = model.predict_proba(x.view()).unwrap();
        assert!((proba[[0, 1]] - fallback_probability(&row)).abs() < 1e-12);
        assert!((proba[[0, 0]] + proba[[0, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scaler_is_applied() {
        let scaler = StandardScaler {
            mean: vec![3.0, 2.0, 5.0, 40.0, 0.5],
            scale: vec![1.0, 1.0, 1.0, 10.0, 0.5],
        };
        let model = LogisticPipeline::new(Some(scaler), vec![1.0, 0.0, 0.0, 0.0, 0.0], 0.0);

        // stress at the mean → logit 0
        let proba = model.predict_proba(array![[3.0, 0.0, 0.0, 0.0, 0.0]].view()).unwrap();
        assert!((proba[[0, 1]] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_json_round_trip_and_checks() {
        let model = fallback_as_pipeline();
        let bytes = model.to_json().unwrap();
        assert_eq!(LogisticPipeline::from_json(&bytes).unwrap(), model);

        let mut short = model.clone();
        short.steps.clf.coef.pop();
        assert!(matches!(short.check(), Err(ArtifactError::Length { stage: "clf.coef", got: 4, .. })));

        let mut stale = model.clone();
        stale.feature_version += 1;
        assert!(matches!(stale.check(), Err(ArtifactError::Layout(_))));

        assert!(matches!(
            LogisticPipeline::from_json(b"{not json"),
            Err(PipelineLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_feature_count() {
        let model = fallback_as_pipeline();
        let x = Array2::<f64>::zeros((2, 4));
        assert_eq!(
            model.predict_proba(x.view()).unwrap_err(),
            ModelError::FeatureCount { expected: 5, got: 4 }
        );
    }

    #[test]
    fn test_exposes_linear_stage() {
        let model = fallback_as_pipeline();
        let linear = model.linear().unwrap();
        assert_eq!(linear.coefficients(), FALLBACK_COEFFICIENTS.to_vec());
        assert_eq!(linear.intercept(), FALLBACK_INTERCEPT);
    }
}
