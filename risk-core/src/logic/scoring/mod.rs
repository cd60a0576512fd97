//! Scorer - Probability and class per record
//!
//! With a model, the positive-class probability comes from its
//! `PredictProba` capability; without one, from the fallback formula.
//! Classification uses the unrounded probability; the reported
//! percentage is rounded to one decimal afterwards.

use std::collections::BTreeMap;

use ndarray::Array2;
use serde::Serialize;

use crate::logic::features::{Batch, FeatureRow, Record, FEATURE_COUNT};
use crate::logic::model::{fallback_probability, positive_class, ModelError, RiskLabel, RiskModel};


/// A record with its probability (percent, one decimal) and class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: Record,

    /// Extra input columns, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,

    pub probabilite: f64,
    pub classe: RiskLabel,
}

/// Scored rows in input order, plus the raw input cells for export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredBatch {
    header: Vec<String>,
    cells: Vec<Vec<String>>,
    rows: Vec<ScoredRecord>,
}

impl ScoredBatch {
    pub fn rows(&self) -> &[ScoredRecord] {
        &self.rows
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<ScoredRecord> {
        self.rows
    }
}

/// Batch scorer
pub struct Scorer;

impl Scorer {
    /// Score a validated batch
    ///
    /// Model failures are fatal to the request and are not retried.
    pub fn predict(
        batch: &Batch,
        model: Option<&dyn RiskModel>,
        threshold: f64,
    ) -> Result<ScoredBatch, ModelError> {
        let features = batch.feature_rows();
        let probabilities = probabilities(&features, model)?;

        let rows = batch
            .records()
            .iter()
            .zip(batch.cells())
            .zip(probabilities)
            .map(|((record, cells), p)| ScoredRecord {
                record: record.clone(),
                extra: batch
                    .extra_columns()
                    .map(|(i, name)| (name.to_string(), cells.get(i).cloned().unwrap_or_default()))
                    .collect(),
                probabilite: to_percent(p),
                classe: RiskLabel::classify(p, threshold),
            })
            .collect();

        log::debug!(
            "Scored {} rows ({})",
            batch.len(),
            if model.is_some() { "model" } else { "fallback" }
        );

        Ok(ScoredBatch {
            header: batch.header().to_vec(),
            cells: batch.cells().to_vec(),
            rows,
        })
    }
}

/// Stack feature rows into an n×5 matrix
pub fn feature_matrix(rows: &[FeatureRow]) -> Array2<f64> {
    Array2::from_shape_fn((rows.len(), FEATURE_COUNT), |(i, j)| rows[i][j])
}

/// Positive-class probabilities (0..1) in row order
pub fn probabilities(rows: &[FeatureRow], model: Option<&dyn RiskModel>) -> Result<Vec<f64>, ModelError> {
    match model {
        Some(model) => {
            if rows.is_empty() {
                return Ok(Vec::new());
            }
            let x = feature_matrix(rows);
            Ok(positive_class(model, x.view())?.to_vec())
        }
        None => Ok(rows.iter().map(fallback_probability).collect()),
    }
}

/// Probability (0..1) as a percentage rounded to one decimal, ties to even
pub fn to_percent(probability: f64) -> f64 {
    round_to(probability * 100.0, 1)
}

/// Round to `decimals` places, ties to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
