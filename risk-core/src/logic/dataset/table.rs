use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use super::DatasetError;

/// Uncoerced table: header plus string cells, row order preserved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a comma-separated table with a header row
    ///
    /// Cells are trimmed. Rows with a different field count than the header
    /// are rejected by the CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(DatasetError::MissingHeader);
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        log::debug!("Read table: {} columns, {} rows", headers.len(), rows.len());
        Ok(Self { headers, rows })
    }

    /// Read a table from a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Position of a column (first occurrence)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows, for previews
    pub fn head(&self, n: usize) -> RawTable {
        RawTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
