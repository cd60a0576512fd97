use super::*;
use crate::logic::scoring::Scorer;
use crate::logic::validate::validate_and_coerce;
use tempfile::tempdir;
use std::fs;

const CSV: &str = "id,stress,ics,scg,age,poste_nuit,service\n\
                   U1,5,4,0,60,1,urgences\n\
                   U2, 3 ,1,7,40,0,bloc\n";

#[test]
fn test_read_table() {
    let table = RawTable::from_reader(CSV.as_bytes()).unwrap();

    assert_eq!(table.headers.len(), 7);
    assert_eq!(table.len(), 2);
    assert_eq!(table.column("stress").unwrap(), vec!["5", "3"]);
    assert_eq!(table.column_index("service"), Some(6));
    assert!(table.column("missing").is_none());
    assert_eq!(table.head(1).len(), 1);
}

#[test]
fn test_ragged_row_is_an_error() {
    let csv = "id,stress\nA,1,2\n";
    assert!(matches!(RawTable::from_reader(csv.as_bytes()), Err(DatasetError::Csv(_))));
}

#[test]
fn test_empty_input_has_no_header() {
    assert!(matches!(RawTable::from_reader("".as_bytes()), Err(DatasetError::MissingHeader)));
}

#[test]
fn test_export_appends_result_columns() {
    let table = RawTable::from_reader(CSV.as_bytes()).unwrap();
    let batch = validate_and_coerce(&table).unwrap();
    let scored = Scorer::predict(&batch, None, 0.5).unwrap();

    let out = String::from_utf8(to_csv_bytes(&scored).unwrap()).unwrap();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "id,stress,ics,scg,age,poste_nuit,service,probabilite,classe");
    assert_eq!(lines[1], "U1,5,4,0,60,1,urgences,99.9,À risque");
    assert_eq!(lines[2], "U2,3,1,7,40,0,bloc,34.3,Stable");
}

#[test]
fn test_export_overwrites_existing_result_columns() {
    let csv = "classe,id,stress,ics,scg,age,poste_nuit\nold,U1,5,4,0,60,1\n";
    let table = RawTable::from_reader(csv.as_bytes()).unwrap();
    let batch = validate_and_coerce(&table).unwrap();
    let scored = Scorer::predict(&batch, None, 0.5).unwrap();

    let out = String::from_utf8(to_csv_bytes(&scored).unwrap()).unwrap();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "classe,id,stress,ics,scg,age,poste_nuit,probabilite");
    assert_eq!(lines[1], "À risque,U1,5,4,0,60,1,99.9");
}

#[test]
fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    fs::write(&input, CSV).unwrap();

    let table = RawTable::from_path(&input).unwrap();
    let batch = validate_and_coerce(&table).unwrap();
    let scored = Scorer::predict(&batch, None, 0.5).unwrap();

    let output = dir.path().join("out").join("predictions.csv");
    save_csv(&scored, &output).unwrap();

    let reloaded = RawTable::from_path(&output).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.column("classe").unwrap(), vec!["À risque", "Stable"]);
}
