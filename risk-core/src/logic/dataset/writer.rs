use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::logic::features::layout::{CLASS_COLUMN, PROBABILITY_COLUMN};
use crate::logic::scoring::ScoredBatch;
use super::DatasetError;

/// Write scored output: input columns in their original order, then
/// `probabilite` and `classe`
///
/// An input column already named `probabilite` or `classe` is overwritten
/// in place rather than duplicated.
pub fn write_csv<W: Write>(scored: &ScoredBatch, writer: W) -> Result<(), DatasetError> {
    let (header, prob_idx, class_idx) = output_header(scored.header());

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&header)?;

    for (cells, row) in scored.cells().iter().zip(scored.rows()) {
        let mut out = cells.clone();
        out.resize(header.len(), String::new());
        out[prob_idx] = format!("{:.1}", row.probabilite);
        out[class_idx] = row.classe.to_string();
        writer.write_record(&out)?;
    }

    writer.flush()?;
    Ok(())
}

/// Scored output as CSV bytes (UTF-8)
pub fn to_csv_bytes(scored: &ScoredBatch) -> Result<Vec<u8>, DatasetError> {
    let mut buf = Vec::new();
    write_csv(scored, &mut buf)?;
    Ok(buf)
}

/// Save scored output to a CSV file, creating parent directories
pub fn save_csv(scored: &ScoredBatch, path: &Path) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_csv(scored, file)?;
    log::info!("Exported {} scored rows to {}", scored.len(), path.display());
    Ok(())
}

fn output_header(input: &[String]) -> (Vec<String>, usize, usize) {
    let mut header = input.to_vec();
    let prob_idx = column_or_push(&mut header, PROBABILITY_COLUMN);
    let class_idx = column_or_push(&mut header, CLASS_COLUMN);
    (header, prob_idx, class_idx)
}

fn column_or_push(header: &mut Vec<String>, name: &str) -> usize {
    match header.iter().position(|h| h == name) {
        Some(idx) => idx,
        None => {
            header.push(name.to_string());
            header.len() - 1
        }
    }
}
