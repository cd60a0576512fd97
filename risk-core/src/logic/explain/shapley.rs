//! Exact Shapley attribution over the five features
//!
//! Coalition value is the interventional expectation: features in the
//! coalition take the explained row's values, the rest take each
//! background row's values in turn, and the model output is averaged.
//! With five features there are 32 coalitions, so every coalition is
//! evaluated in a single model call.

use ndarray::{Array1, Array2, ArrayView2};

use super::engine::{Attribution, AttributionError, Attributor};
use crate::logic::features::FEATURE_COUNT;
use crate::logic::model::{positive_class, RiskModel};

/// Exact Shapley values against a background sample
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactShapley;

impl Attributor for ExactShapley {
    fn attribute(
        &self,
        model: &dyn RiskModel,
        background: ArrayView2<'_, f64>,
        rows: ArrayView2<'_, f64>,
    ) -> Result<Attribution, AttributionError> {
        let d = FEATURE_COUNT;
        let b = background.nrows();
        if b == 0 {
            return Err(AttributionError::EmptyBackground);
        }
        for got in [background.ncols(), rows.ncols()] {
            if got != d {
                return Err(AttributionError::FeatureCount { expected: d, got });
            }
        }

        let n = rows.nrows();
        let coalitions = 1usize << d;

        // (row, coalition, background) flattened into one matrix
        let mut synthetic = Array2::<f64>::zeros((n * coalitions * b, d));
        for r in 0..n {
            for mask in 0..coalitions {
                for k in 0..b {
                    let idx = (r * coalitions + mask) * b + k;
                    for j in 0..d {
                        synthetic[[idx, j]] = if mask & (1 << j) != 0 {
                            rows[[r, j]]
                        } else {
                            background[[k, j]]
                        };
                    }
                }
            }
        }

        let base_value = mean(&positive_class(model, background)?);

        let mut values = Array2::<f64>::zeros((n, d));
        if n == 0 {
            return Ok(Attribution { base_value, values });
        }

        let outputs = positive_class(model, synthetic.view())?;
        let coalition_value = |r: usize, mask: usize| -> f64 {
            let start = (r * coalitions + mask) * b;
            outputs.slice(ndarray::s![start..start + b]).sum() / b as f64
        };

        let weights = shapley_weights(d);
        for r in 0..n {
            for j in 0..d {
                let bit = 1 << j;
                let mut phi = 0.0;
                for mask in (0..coalitions).filter(|m| m & bit == 0) {
                    let size = mask.count_ones() as usize;
                    phi += weights[size] * (coalition_value(r, mask | bit) - coalition_value(r, mask));
                }
                values[[r, j]] = phi;
            }
        }

        Ok(Attribution { base_value, values })
    }
}

/// |S|! (d - |S| - 1)! / d! for each coalition size |S| < d
fn shapley_weights(d: usize) -> Vec<f64> {
    let total = factorial(d);
    (0..d)
        .map(|s| factorial(s) * factorial(d - s - 1) / total)
        .collect()
}

fn factorial(k: usize) -> f64 {
    (1..=k).map(|i| i as f64).product()
}

fn mean(values: &Array1<f64>) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.sum() / values.len() as f64
    }
}
