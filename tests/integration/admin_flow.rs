//! Integration tests for the admin table view
//!
//! Loading, deleting by position or id, and exporting.

use super::common::determinism::test_now;
use super::common::fixtures::{required_only, TestTable};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use subportal::{CorruptTablePolicy, Record, SubmissionForm, Table};

fn seed(table: &TestTable, names: &[&str]) -> Vec<Record> {
    names
        .iter()
        .map(|name| {
            let record = required_only(name, "555-0100", "ops@example.com")
                .into_record(test_now())
                .unwrap();
            table.store.append(record.clone()).unwrap();
            record
        })
        .collect()
}

#[test]
fn test_load_reports_no_data_when_absent() {
    let table = TestTable::new(CorruptTablePolicy::Quarantine);
    assert!(table.admin.load().unwrap().is_none());
}

#[test]
fn test_delete_position_one_of_three() {
    let table = TestTable::new(CorruptTablePolicy::Quarantine);
    let rows = seed(&table, &["zero", "one", "two"]);

    let snapshot = table.admin.load().unwrap().unwrap();
    let result = table
        .admin
        .delete(&snapshot, &BTreeSet::from([1]))
        .unwrap();

    assert_eq!(result.rows(), &[rows[0].clone(), rows[2].clone()]);
    let on_disk = Table::from_csv_slice(&fs::read(&table.path).unwrap()).unwrap();
    assert_eq!(on_disk, result);
}

#[test]
fn test_empty_selection_does_not_rewrite() {
    let table = TestTable::new(CorruptTablePolicy::Quarantine);
    // Hand-written layout; any rewrite would normalize the header.
    let original = "business_name,phone,email\nAcme LLC,555-1111,a@acme.com\n";
    fs::write(&table.path, original).unwrap();

    let snapshot = table.admin.load().unwrap().unwrap();
    let result = table.admin.delete(&snapshot, &BTreeSet::new()).unwrap();

    assert_eq!(result, snapshot);
    assert_eq!(fs::read_to_string(&table.path).unwrap(), original);
}

#[test]
fn test_delete_all_rows_leaves_empty_table() {
    let table = TestTable::new(CorruptTablePolicy::Quarantine);
    seed(&table, &["a", "b"]);

    let snapshot = table.admin.load().unwrap().unwrap();
    let result = table
        .admin
        .delete(&snapshot, &BTreeSet::from([0, 1]))
        .unwrap();

    assert!(result.is_empty());
    assert!(table.admin.load().unwrap().unwrap().is_empty());
}

#[test]
fn test_delete_by_id() {
    let table = TestTable::new(CorruptTablePolicy::Quarantine);
    let rows = seed(&table, &["a", "b", "c"]);

    let ids = HashSet::from([rows[0].id().unwrap(), rows[2].id().unwrap()]);
    let result = table.admin.delete_ids(&ids).unwrap();

    assert_eq!(result.rows(), &[rows[1].clone()]);
    assert_eq!(table.row_count(), 1);
}

#[test]
fn test_export_round_trips_free_text() {
    let table = TestTable::new(CorruptTablePolicy::Quarantine);

    let empty = table.admin.export().unwrap();
    assert!(Table::from_csv_slice(&empty).unwrap().is_empty());

    let form = SubmissionForm {
        address: "12 Oak St, Suite \"B\"\nHouston, TX 77002".into(),
        notes: "Prefers mornings,\r\nasks for \"Sam\"".into(),
        references: "A, B, and C".into(),
        certifications: vec!["SBA 8(a)".into(), "Other".into()],
        ..required_only("Oak \"Works\", Inc.", "555-0101", "sam@oak.example")
    };
    table
        .store
        .append(form.into_record(test_now()).unwrap())
        .unwrap();

    let one = table.admin.export().unwrap();
    let reparsed = Table::from_csv_slice(&one).unwrap();
    assert_eq!(reparsed, table.admin.load().unwrap().unwrap());
    assert_eq!(reparsed.rows()[0].certifications, "SBA 8(a), Other");

    seed(&table, &["second", "third"]);
    let many = table.admin.export().unwrap();
    assert_eq!(
        Table::from_csv_slice(&many).unwrap(),
        table.admin.load().unwrap().unwrap()
    );
}
