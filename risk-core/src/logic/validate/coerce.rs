//! Cell coercion for the five scoring columns
//!
//! Integer columns are stricter than a truncating cast: `"2.0"` is accepted
//! as 2, but `"2.5"` is a type error instead of silently becoming 2.

use crate::logic::dataset::RawTable;

/// Largest integer an f64 holds exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Parse a real cell; empty, NaN and infinite values are rejected
pub fn parse_real(cell: &str) -> Option<f64> {
    let value: f64 = cell.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse an integer cell
///
/// Accepts integer literals and reals with no fractional part (`"2.0"`),
/// rejects anything that would need truncation (`"2.5"`).
pub fn parse_integer(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if let Ok(value) = cell.parse::<i64>() {
        return Some(value);
    }

    let value = parse_real(cell)?;
    (value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER).then_some(value as i64)
}

/// Coerce a whole column to reals; `None` if any cell fails
pub(super) fn real_column(table: &RawTable, name: &str) -> Option<Vec<f64>> {
    table.column(name)?.into_iter().map(parse_real).collect()
}

/// Coerce a whole column to integers; `None` if any cell fails
pub(super) fn integer_column(table: &RawTable, name: &str) -> Option<Vec<i64>> {
    table.column(name)?.into_iter().map(parse_integer).collect()
}
