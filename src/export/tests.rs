#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::models::ExpenseCategory;

#[test]
fn test_write_csv_with_header_and_quoting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    let mut first = Expense::new(
        "Dinner, with friends".into(),
        dec!(950.5),
        ExpenseCategory::Food,
        "2025-06-12".into(),
    );
    first.id = Some(7);
    let second = Expense::new(
        "Bus".into(),
        dec!(30),
        ExpenseCategory::Transport,
        "2025-06-13".into(),
    );

    let count = write_csv(&path, &[first, second]).unwrap();
    assert_eq!(count, 2);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "id,date,description,category,amount");
    assert_eq!(lines[1], "7,2025-06-12,\"Dinner, with friends\",Food,950.50");
    assert_eq!(lines[2], ",2025-06-13,Bus,Transport,30.00");
}

#[test]
fn test_write_csv_empty_still_has_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    assert_eq!(write_csv(&path, &[]).unwrap(), 0);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.trim(), "id,date,description,category,amount");
}

#[test]
fn test_write_csv_bad_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");
    assert!(write_csv(&path, &[]).is_err());
}
