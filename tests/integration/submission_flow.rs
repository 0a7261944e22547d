//! Integration tests for the submission path
//!
//! Form validation, appending to the table, and recovery from an
//! unreadable table.

use super::common::determinism::{test_now, TEST_TIMESTAMP_COLUMN};
use super::common::fixtures::{required_only, TestTable};
use std::fs;
use subportal::{AppendOutcome, CorruptTablePolicy, Table};

#[test]
fn test_first_submission_creates_table() {
    let table = TestTable::new(CorruptTablePolicy::Quarantine);
    assert!(!table.path.exists());

    let record = required_only("Acme LLC", "555-1111", "a@acme.com")
        .into_record(test_now())
        .unwrap();
    table.store.append(record).unwrap();

    assert!(table.path.exists());
    let loaded = table.admin.load().unwrap().unwrap();
    assert_eq!(loaded.len(), 1);

    let row = &loaded.rows()[0];
    assert_eq!(row.business_name, "Acme LLC");
    assert_eq!(row.phone, "555-1111");
    assert_eq!(row.email, "a@acme.com");
    assert_eq!(row.timestamp_utc, TEST_TIMESTAMP_COLUMN);
    assert_eq!(row.contact_name, "");
    assert_eq!(row.notes, "");
}

#[test]
fn test_appends_preserve_prior_rows_in_order() {
    let table = TestTable::new(CorruptTablePolicy::Quarantine);
    let mut expected = Vec::new();

    for i in 0..5 {
        let record = required_only(&format!("Biz {i}"), "555", "x@y.z")
            .into_record(test_now())
            .unwrap();
        table.store.append(record.clone()).unwrap();
        expected.push(record);

        let loaded = table.admin.load().unwrap().unwrap();
        assert_eq!(loaded.rows(), expected.as_slice());
    }
}

#[test]
fn test_invalid_submission_never_writes() {
    let table = TestTable::new(CorruptTablePolicy::Quarantine);

    for form in [
        required_only("", "555-1111", "a@acme.com"),
        required_only("Acme LLC", "", "a@acme.com"),
        required_only("Acme LLC", "555-1111", ""),
    ] {
        assert!(form.into_record(test_now()).is_err());
    }
    assert!(!table.path.exists());

    let ok = required_only("Acme LLC", "555-1111", "a@acme.com")
        .into_record(test_now())
        .unwrap();
    table.store.append(ok).unwrap();

    let err = required_only("Acme LLC", "555-1111", "   ")
        .into_record(test_now())
        .unwrap_err();
    assert_eq!(err.missing, vec!["Email"]);
    assert_eq!(table.row_count(), 1);
}

#[test]
fn test_unparsable_table_is_replaced_by_new_submission() {
    let table = TestTable::new(CorruptTablePolicy::Discard);
    fs::write(&table.path, "business_name,phone\nAcme,555,too,many,fields\n").unwrap();

    let record = required_only("Fresh Co", "555-2222", "f@fresh.co")
        .into_record(test_now())
        .unwrap();
    let outcome = table.store.append(record).unwrap();

    assert_eq!(
        outcome,
        AppendOutcome::RecoveredFromCorruption { quarantined: None }
    );
    let loaded = table.admin.load().unwrap().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.rows()[0].business_name, "Fresh Co");
}

#[test]
fn test_quarantine_keeps_prior_bytes_for_the_operator() {
    let table = TestTable::new(CorruptTablePolicy::Quarantine);
    let garbage = "business_name,phone\nAcme,555,too,many,fields\n";
    fs::write(&table.path, garbage).unwrap();

    let record = required_only("Fresh Co", "555-2222", "f@fresh.co")
        .into_record(test_now())
        .unwrap();
    table.store.append(record).unwrap();

    assert_eq!(table.row_count(), 1);
    let quarantined = table.admin.quarantined_files();
    assert_eq!(quarantined.len(), 1);
    assert_eq!(fs::read_to_string(&quarantined[0]).unwrap(), garbage);
}

#[test]
fn test_table_without_record_id_column_accepts_appends() {
    let table = TestTable::new(CorruptTablePolicy::Refuse);
    fs::write(
        &table.path,
        "timestamp_utc,contact_name,business_name,phone,email,notes\n\
         2023/12/31 10:00:00,Pat,Old Co,555-0000,old@co.com,\"multi\nline\"\n",
    )
    .unwrap();

    let record = required_only("New Co", "555-3333", "n@co.com")
        .into_record(test_now())
        .unwrap();
    table.store.append(record).unwrap();

    let loaded = table.admin.load().unwrap().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.rows()[0].business_name, "Old Co");
    assert_eq!(loaded.rows()[0].notes, "multi\nline");
    assert_eq!(loaded.rows()[0].record_id, "");
    assert_eq!(loaded.rows()[1].business_name, "New Co");

    // Rewritten with the full header, so it parses the same way again.
    let reparsed = Table::from_csv_slice(&fs::read(&table.path).unwrap()).unwrap();
    assert_eq!(reparsed, loaded);
}
