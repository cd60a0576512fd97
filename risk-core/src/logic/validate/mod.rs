//! Validator - Schema, type and range checks for candidate records
//!
//! All-or-nothing: a single bad cell blocks the whole batch, and every
//! failed rule is reported together.
//!
//! ## Order of checks
//! 1. Required columns (short-circuits: nothing else runs)
//! 2. Type coercion per column (one generic message)
//! 3. Range rules per column (one message per violated rule)
//!
//! A column with any uncoercible cell is left out of range checking.

mod coerce;

#[cfg(test)]
mod tests;

use crate::logic::dataset::RawTable;
use crate::logic::features::layout::{ID_COLUMN, REQUIRED_COLUMNS};
use crate::logic::features::{Batch, Record};

pub use coerce::{parse_integer, parse_real};

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Schema,
    Type,
    Range,
}

/// One failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("Colonnes manquantes: {}", format_columns(.columns))]
    MissingColumns { columns: Vec<String> },

    #[error("Types invalides: stress/scg en float, ics/age/poste_nuit en entier (poste_nuit=0/1)")]
    InvalidTypes,

    #[error("stress hors bornes [1..5]")]
    StressOutOfRange,

    #[error("ics doit être 0..4")]
    IcsOutOfRange,

    #[error("scg hors bornes [0..10]")]
    ScgOutOfRange,

    #[error("poste_nuit doit être 0 ou 1")]
    NightShiftOutOfRange,
}

impl ValidationIssue {
    pub fn kind(&self) -> IssueKind {
        match self {
            ValidationIssue::MissingColumns { .. } => IssueKind::Schema,
            ValidationIssue::InvalidTypes => IssueKind::Type,
            _ => IssueKind::Range,
        }
    }
}

fn join_messages(issues: &[ValidationIssue]) -> String {
    let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
    messages.join("; ")
}

fn format_columns(columns: &[String]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{}'", c)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Every issue found for one request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_messages(.issues))]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Human-readable messages, in check order
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Validate a raw table; empty list iff every check passed
pub fn validate(table: &RawTable) -> Vec<ValidationIssue> {
    match validate_and_coerce(table) {
        Ok(_) => Vec::new(),
        Err(report) => report.issues,
    }
}

/// Validate a raw table and, if it is clean, return the typed batch
pub fn validate_and_coerce(table: &RawTable) -> Result<Batch, ValidationReport> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ValidationReport::new(vec![ValidationIssue::MissingColumns {
            columns: missing,
        }]));
    }

    let stress = coerce::real_column(table, "stress");
    let ics = coerce::integer_column(table, "ics");
    let scg = coerce::real_column(table, "scg");
    let age = coerce::integer_column(table, "age");
    let poste_nuit = coerce::integer_column(table, "poste_nuit");

    let mut issues = Vec::new();

    if stress.is_none() || ics.is_none() || scg.is_none() || age.is_none() || poste_nuit.is_none() {
        issues.push(ValidationIssue::InvalidTypes);
    }

    issues.extend(check_ranges(
        stress.as_deref(),
        ics.as_deref(),
        scg.as_deref(),
        poste_nuit.as_deref(),
    ));

    let (Some(stress), Some(ics), Some(scg), Some(age), Some(poste_nuit)) =
        (stress, ics, scg, age, poste_nuit)
    else {
        return Err(ValidationReport::new(issues));
    };

    if !issues.is_empty() {
        return Err(ValidationReport::new(issues));
    }

    let ids = table.column(ID_COLUMN).unwrap_or_default();
    let records = ids
        .into_iter()
        .enumerate()
        .map(|(i, id)| Record {
            id: id.to_string(),
            stress: stress[i],
            ics: ics[i],
            scg: scg[i],
            age: age[i],
            poste_nuit: poste_nuit[i],
        })
        .collect();

    Ok(Batch::from_parts(table.headers.clone(), table.rows.clone(), records))
}

/// Validate already-typed records (interactive mode)
///
/// Non-finite reals count as a type error and skip their range rule.
pub fn validate_records(records: &[Record]) -> Vec<ValidationIssue> {
    let stress: Option<Vec<f64>> = finite(records.iter().map(|r| r.stress));
    let scg: Option<Vec<f64>> = finite(records.iter().map(|r| r.scg));
    let ics: Vec<i64> = records.iter().map(|r| r.ics).collect();
    let poste_nuit: Vec<i64> = records.iter().map(|r| r.poste_nuit).collect();

    let mut issues = Vec::new();
    if stress.is_none() || scg.is_none() {
        issues.push(ValidationIssue::InvalidTypes);
    }

    issues.extend(check_ranges(
        stress.as_deref(),
        Some(ics.as_slice()),
        scg.as_deref(),
        Some(poste_nuit.as_slice()),
    ));
    issues
}

fn finite(values: impl Iterator<Item = f64>) -> Option<Vec<f64>> {
    values.map(|v| v.is_finite().then_some(v)).collect()
}

// ============================================================================
// RANGE RULES
// ============================================================================

/// Range rules, each checked independently over the columns that coerced
fn check_ranges(
    stress: Option<&[f64]>,
    ics: Option<&[i64]>,
    scg: Option<&[f64]>,
    poste_nuit: Option<&[i64]>,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Some(values) = stress {
        if values.iter().any(|v| !(1.0..=5.0).contains(v)) {
            issues.push(ValidationIssue::StressOutOfRange);
        }
    }

    if let Some(values) = ics {
        if values.iter().any(|v| !(0..=4).contains(v)) {
            issues.push(ValidationIssue::IcsOutOfRange);
        }
    }

    if let Some(values) = scg {
        if values.iter().any(|v| !(0.0..=10.0).contains(v)) {
            issues.push(ValidationIssue::ScgOutOfRange);
        }
    }

    if let Some(values) = poste_nuit {
        if values.iter().any(|v| !(0..=1).contains(v)) {
            issues.push(ValidationIssue::NightShiftOutOfRange);
        }
    }

    issues
}
