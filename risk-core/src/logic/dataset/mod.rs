//! Dataset Module - CSV tables in and out
//!
//! Batch input arrives as a raw string table; validation turns it into a
//! typed `Batch`. Scored output is written back with the same column order
//! plus `probabilite` and `classe`.

pub mod table;
pub mod writer;

#[cfg(test)]
mod tests;

pub use table::RawTable;
pub use writer::{save_csv, to_csv_bytes, write_csv};

/// Errors reading or writing tables
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV has no header row")]
    MissingHeader,
}
