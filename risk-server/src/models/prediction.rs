//! Single-record prediction bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use santerisk_core::constants::SINGLE_RECORD_ID;
use santerisk_core::logic::model::RiskLabel;
use santerisk_core::{FeatureImportance, RawTable, SingleOutcome, FEATURE_LAYOUT};

/// Scoring fields are taken as raw JSON so that they go through the same
/// schema and coercion rules as a one-row batch table
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PredictRequest {
    #[serde(default = "default_id")]
    pub id: String,
    pub stress: Option<Value>,
    pub ics: Option<Value>,
    pub scg: Option<Value>,
    pub age: Option<Value>,
    pub poste_nuit: Option<Value>,

    /// Falls back to the server default when absent
    #[validate(range(min = 0.0, max = 1.0))]
    pub threshold: Option<f64>,
}

fn default_id() -> String {
    SINGLE_RECORD_ID.to_string()
}

impl PredictRequest {
    /// One-row table holding `id` plus every scoring field present
    pub fn to_table(&self) -> RawTable {
        let values = [&self.stress, &self.ics, &self.scg, &self.age, &self.poste_nuit];

        let mut headers = vec!["id".to_string()];
        let mut row = vec![self.id.clone()];
        for (name, value) in FEATURE_LAYOUT.iter().zip(values) {
            if let Some(value) = value {
                headers.push(name.to_string());
                row.push(cell(value));
            }
        }

        RawTable::new(headers, vec![row])
    }
}

/// JSON value as a table cell; non-scalar values never coerce
fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub id: String,
    /// Percent, one decimal
    pub probabilite: f64,
    pub classe: RiskLabel,
    pub threshold: f64,
    pub model_loaded: bool,
    pub importances: Vec<FeatureImportance>,
}

impl PredictResponse {
    pub fn new(outcome: SingleOutcome, threshold: f64, model_loaded: bool) -> Self {
        Self {
            id: outcome.record.record.id,
            probabilite: outcome.record.probabilite,
            classe: outcome.record.classe,
            threshold,
            model_loaded,
            importances: outcome.importances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> PredictRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_table_keeps_present_fields_only() {
        let table = request(json!({ "ics": 1, "scg": 7.5, "age": 40, "poste_nuit": 0 })).to_table();

        assert_eq!(table.headers, vec!["id", "ics", "scg", "age", "poste_nuit"]);
        assert_eq!(table.rows, vec![vec!["UNITE", "1", "7.5", "40", "0"]]);
    }

    #[test]
    fn test_cells_keep_json_number_text() {
        let table = request(json!({
            "id": "A", "stress": "3", "ics": 1.0, "scg": 7, "age": 40, "poste_nuit": true
        }))
        .to_table();

        assert_eq!(table.rows[0], vec!["A", "3", "1.0", "7", "40", "true"]);
    }
}
