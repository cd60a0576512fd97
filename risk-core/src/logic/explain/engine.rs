use ndarray::{Array2, ArrayView2};

use super::types::{Explanation, FeatureImportance};
use crate::logic::features::{feature_description, FeatureRow, FEATURE_COUNT, FEATURE_LAYOUT};
use crate::logic::model::{ModelError, RiskModel};
use crate::logic::scoring::feature_matrix;

/// Attribution backend: per-row, per-feature contributions to the
/// positive-class probability, relative to a background sample
pub trait Attributor: Send + Sync {
    fn attribute(
        &self,
        model: &dyn RiskModel,
        background: ArrayView2<'_, f64>,
        rows: ArrayView2<'_, f64>,
    ) -> Result<Attribution, AttributionError>;
}

/// Raw backend output
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    pub base_value: f64,
    /// rows × features
    pub values: Array2<f64>,
}

/// Failure inside the attribution path; reported as a warning
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttributionError {
    #[error("empty background sample")]
    EmptyBackground,

    #[error("expected {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },

    #[error("backend returned {got:?} values for {expected:?}")]
    Shape {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("model call failed: {0}")]
    Model(#[from] ModelError),
}

/// Coefficient importances, largest magnitude first
///
/// Empty when the model has no linear stage or its coefficients are
/// unusable. Empty means "not available", not "zero importance".
pub fn importances(model: &dyn RiskModel) -> Vec<FeatureImportance> {
    let Some(linear) = model.linear() else {
        return Vec::new();
    };

    let coefs = linear.coefficients();
    if coefs.len() != FEATURE_COUNT || coefs.iter().any(|c| !c.is_finite()) {
        log::debug!("Ignoring linear stage with {} coefficients", coefs.len());
        return Vec::new();
    }

    let mut list: Vec<FeatureImportance> = FEATURE_LAYOUT
        .iter()
        .zip(coefs)
        .map(|(name, weight)| FeatureImportance {
            name: name.to_string(),
            weight,
            importance: weight.abs(),
            description: feature_description(name).map(str::to_string),
        })
        .collect();

    // Stable: equal magnitudes keep layout order
    list.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    list
}

/// Bounded local attribution over the first rows of a feature table
///
/// Background is the first `max_background` rows, evaluation the first
/// `max_rows` rows. Returns `Ok(None)` on an empty table without calling
/// the backend.
pub fn explain_batch(
    model: &dyn RiskModel,
    features: &[FeatureRow],
    max_background: usize,
    max_rows: usize,
    attributor: &dyn Attributor,
) -> Result<Option<Explanation>, AttributionError> {
    if features.is_empty() {
        return Ok(None);
    }

    let background_rows = &features[..max_background.min(features.len())];
    let eval_rows = &features[..max_rows.min(features.len())];

    let background = feature_matrix(background_rows);
    let eval = feature_matrix(eval_rows);

    let attribution = attributor.attribute(model, background.view(), eval.view())?;

    let expected = (eval_rows.len(), FEATURE_COUNT);
    if attribution.values.dim() != expected {
        return Err(AttributionError::Shape {
            expected,
            got: attribution.values.dim(),
        });
    }

    let values = attribution
        .values
        .rows()
        .into_iter()
        .map(|row| {
            let mut out = [0.0; FEATURE_COUNT];
            for (slot, v) in out.iter_mut().zip(row.iter()) {
                *slot = *v;
            }
            out
        })
        .collect();

    log::debug!(
        "Explained {} rows against {} background rows",
        eval_rows.len(),
        background_rows.len()
    );

    Ok(Some(Explanation {
        feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        base_value: attribution.base_value,
        values,
        rows: eval_rows.to_vec(),
        background_size: background_rows.len(),
    }))
}
