use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureRow, FEATURE_COUNT};

/// One entry of the global importance list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub weight: f64,     // signed coefficient
    pub importance: f64, // |weight|
    pub description: Option<String>,
}

/// Local attributions for the evaluated rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub feature_names: Vec<String>,
    /// Mean positive-class probability over the background sample
    pub base_value: f64,
    /// One attribution per feature, per evaluated row
    pub values: Vec<[f64; FEATURE_COUNT]>,
    /// Rows the attributions were computed for
    pub rows: Vec<FeatureRow>,
    pub background_size: usize,
}

impl Explanation {
    /// Mean absolute attribution per feature, largest first
    pub fn mean_abs(&self) -> Vec<(String, f64)> {
        let n = self.values.len().max(1) as f64;
        let mut out: Vec<(String, f64)> = self
            .feature_names
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let total: f64 = self.values.iter().map(|v| v[j].abs()).sum();
                (name.clone(), total / n)
            })
            .collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }
}
