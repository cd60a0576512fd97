//! Typed records and batches
//!
//! A `Batch` is only built by the validator (or from already-typed records),
//! so every record in it has passed schema, type and range checks.

use serde::{Deserialize, Serialize};

use super::layout::{
    CLASS_COLUMN, FEATURE_COUNT, PROBABILITY_COLUMN, REQUIRED_COLUMNS,
};
use crate::constants::SINGLE_RECORD_ID;

/// One row of model input, in `FEATURE_LAYOUT` order
pub type FeatureRow = [f64; FEATURE_COUNT];

/// One subject's inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub stress: f64,
    pub ics: i64,
    pub scg: f64,
    pub age: i64,
    pub poste_nuit: i64,
}

impl Record {
    /// Project the five scoring fields in layout order
    pub fn features(&self) -> FeatureRow {
        [
            self.stress,
            self.ics as f64,
            self.scg,
            self.age as f64,
            self.poste_nuit as f64,
        ]
    }

    /// Night shift flag as a boolean
    pub fn night_shift(&self) -> bool {
        self.poste_nuit == 1
    }

    /// Raw cells in `REQUIRED_COLUMNS` order
    fn to_cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.stress.to_string(),
            self.ics.to_string(),
            self.scg.to_string(),
            self.age.to_string(),
            self.poste_nuit.to_string(),
        ]
    }
}

impl Default for Record {
    /// Interactive form defaults
    fn default() -> Self {
        Self {
            id: SINGLE_RECORD_ID.to_string(),
            stress: 3.0,
            ics: 1,
            scg: 7.0,
            age: 40,
            poste_nuit: 0,
        }
    }
}

/// Ordered records sharing one schema, plus the raw input cells
///
/// Raw cells are kept so that extra input columns pass through to the
/// output untouched and in their original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    header: Vec<String>,
    cells: Vec<Vec<String>>,
    records: Vec<Record>,
}

impl Batch {
    /// Assemble a batch from validated parts
    pub(crate) fn from_parts(header: Vec<String>, cells: Vec<Vec<String>>, records: Vec<Record>) -> Self {
        debug_assert_eq!(cells.len(), records.len());
        Self { header, cells, records }
    }

    /// Build a batch from typed records (no extra columns)
    pub fn from_records(records: Vec<Record>) -> Self {
        let header = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let cells = records.iter().map(Record::to_cells).collect();
        Self { header, cells, records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Feature rows in batch order
    pub fn feature_rows(&self) -> Vec<FeatureRow> {
        self.records.iter().map(Record::features).collect()
    }

    /// Input columns that are neither required nor overwritten by scoring
    pub fn extra_columns(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.header
            .iter()
            .enumerate()
            .filter(|(_, name)| is_passthrough_column(name))
            .map(|(i, name)| (i, name.as_str()))
    }
}

/// Whether an input column is carried through as-is
pub fn is_passthrough_column(name: &str) -> bool {
    !REQUIRED_COLUMNS.contains(&name) && name != PROBABILITY_COLUMN && name != CLASS_COLUMN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_follow_layout_order() {
        let record = Record {
            id: "A".into(),
            stress: 2.5,
            ics: 3,
            scg: 6.0,
            age: 52,
            poste_nuit: 1,
        };
        assert_eq!(record.features(), [2.5, 3.0, 6.0, 52.0, 1.0]);
        assert!(record.night_shift());
    }

    #[test]
    fn test_batch_from_records() {
        let batch = Batch::from_records(vec![Record::default(), Record::default()]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.header().len(), REQUIRED_COLUMNS.len());
        assert_eq!(batch.cells()[0][0], SINGLE_RECORD_ID);
        assert_eq!(batch.extra_columns().count(), 0);
    }

    #[test]
    fn test_passthrough_columns() {
        assert!(is_passthrough_column("service"));
        assert!(!is_passthrough_column("stress"));
        assert!(!is_passthrough_column("classe"));
    }
}
