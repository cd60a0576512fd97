//! Validator tests: schema short-circuit, type/range independence,
//! and the skip-range-on-failed-coercion policy.

use super::*;

fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

const HEADERS: [&str; 6] = ["id", "stress", "ics", "scg", "age", "poste_nuit"];

#[test]
fn test_valid_table_has_no_issues() {
    let t = table(&HEADERS, &[
        &["A", "3", "1", "7", "40", "0"],
        &["B", "5.0", "4", "0", "60", "1"],
        &["C", "1", "0", "10", "18", "0"],
    ]);
    assert!(validate(&t).is_empty());

    let batch = validate_and_coerce(&t).unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(batch.records()[1].id, "B");
    assert_eq!(batch.records()[1].ics, 4);
    assert_eq!(batch.records()[2].scg, 10.0);
}

#[test]
fn test_missing_columns_short_circuit() {
    // Missing columns plus garbage values: only the schema message
    let t = table(&["id", "stress", "ics"], &[&["A", "oops", "9"]]);
    let issues = validate(&t);

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind(), IssueKind::Schema);
    assert_eq!(
        issues[0].to_string(),
        "Colonnes manquantes: ['scg', 'age', 'poste_nuit']"
    );
}

#[test]
fn test_type_error_is_single_generic_message() {
    let t = table(&HEADERS, &[
        &["A", "x", "1", "7", "40", "0"],
        &["B", "3", "1.5", "y", "40", "0"],
    ]);
    let issues = validate(&t);

    let type_issues: Vec<_> = issues.iter().filter(|i| i.kind() == IssueKind::Type).collect();
    assert_eq!(type_issues.len(), 1);
    assert!(issues[0].to_string().starts_with("Types invalides"));
}

#[test]
fn test_all_range_rules_reported_together() {
    let t = table(&HEADERS, &[
        &["A", "0.5", "5", "11", "40", "2"],
    ]);
    let issues = validate(&t);

    assert_eq!(
        issues,
        vec![
            ValidationIssue::StressOutOfRange,
            ValidationIssue::IcsOutOfRange,
            ValidationIssue::ScgOutOfRange,
            ValidationIssue::NightShiftOutOfRange,
        ]
    );
    assert_eq!(issues[1].to_string(), "ics doit être 0..4");
    assert_eq!(issues[3].to_string(), "poste_nuit doit être 0 ou 1");
}

#[test]
fn test_one_bad_row_fails_whole_batch() {
    let t = table(&HEADERS, &[
        &["A", "3", "1", "7", "40", "0"],
        &["B", "3", "1", "7", "40", "0"],
        &["C", "6", "1", "7", "40", "0"],
    ]);
    let report = validate_and_coerce(&t).unwrap_err();
    assert_eq!(report.issues, vec![ValidationIssue::StressOutOfRange]);
    assert_eq!(report.messages(), vec!["stress hors bornes [1..5]".to_string()]);
}

#[test]
fn test_range_skipped_for_column_that_failed_coercion() {
    // stress fails coercion, so its out-of-range cell is not reported;
    // scg coerced fine and is still range-checked
    let t = table(&HEADERS, &[
        &["A", "abc", "1", "12", "40", "0"],
        &["B", "9", "1", "7", "40", "0"],
    ]);
    let issues = validate(&t);

    assert_eq!(
        issues,
        vec![ValidationIssue::InvalidTypes, ValidationIssue::ScgOutOfRange]
    );
}

#[test]
fn test_age_is_not_range_checked() {
    let t = table(&HEADERS, &[&["A", "3", "1", "7", "120", "0"]]);
    assert!(validate(&t).is_empty());

    let t = table(&HEADERS, &[&["A", "3", "1", "7", "40.5", "0"]]);
    assert_eq!(validate(&t), vec![ValidationIssue::InvalidTypes]);
}

#[test]
fn test_empty_cell_is_type_error() {
    let t = table(&HEADERS, &[&["A", "", "1", "7", "40", "0"]]);
    assert_eq!(validate(&t), vec![ValidationIssue::InvalidTypes]);
}

#[test]
fn test_extra_columns_and_column_order_are_free() {
    let t = table(
        &["service", "poste_nuit", "age", "scg", "ics", "stress", "id"],
        &[&["urgences", "1", "33", "4.5", "2", "2.2", "Z9"]],
    );
    let batch = validate_and_coerce(&t).unwrap();
    let r = &batch.records()[0];
    assert_eq!(r.id, "Z9");
    assert_eq!(r.features(), [2.2, 2.0, 4.5, 33.0, 1.0]);
    assert_eq!(batch.extra_columns().map(|(_, n)| n).collect::<Vec<_>>(), vec!["service"]);
}

#[test]
fn test_empty_table_with_header_is_valid() {
    let t = table(&HEADERS, &[]);
    let batch = validate_and_coerce(&t).unwrap();
    assert!(batch.is_empty());
}

#[test]
fn test_validate_records() {
    assert!(validate_records(&[Record::default()]).is_empty());

    let bad = Record {
        stress: f64::NAN,
        ics: 7,
        ..Record::default()
    };
    assert_eq!(
        validate_records(&[bad]),
        vec![ValidationIssue::InvalidTypes, ValidationIssue::IcsOutOfRange]
    );
}
