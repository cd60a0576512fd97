//! Batch scoring bodies

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use santerisk_core::{BatchOutcome, Explanation, FeatureImportance, ScoredRecord, Summary};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BatchQuery {
    #[validate(range(min = 0.0, max = 1.0))]
    pub threshold: Option<f64>,

    #[serde(default)]
    pub explain: bool,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub batch_id: Uuid,
    pub threshold: f64,
    pub model_loaded: bool,
    pub rows: Vec<ScoredRecord>,
    pub summary: Summary,
    pub importances: Vec<FeatureImportance>,
    pub explanation: Option<Explanation>,
    pub warnings: Vec<String>,
}

impl BatchResponse {
    pub fn new(outcome: BatchOutcome, threshold: f64, model_loaded: bool) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            threshold,
            model_loaded,
            rows: outcome.scored.into_rows(),
            summary: outcome.summary,
            importances: outcome.importances,
            explanation: outcome.explanation,
            warnings: outcome.warnings,
        }
    }
}
