//! End-to-end roster workflow through CSV files on disk.

use std::fs;

use teamlist_core::storage::{export_members, import_members, RowErrorKind, StorageError};
use teamlist_core::{Member, RecordList};

const ROSTER: &str = "First Name,Last Name,Email,Grade,Subteam,Event ID
Alice,Smith,a@x.com,10,Finance,BFS
Bob,Jones,b@x.com,11,Marketing,FTDM
Amy,Young,a2@x.com,9,,
";

fn first_names(members: &[&Member]) -> Vec<String> {
    members.iter().map(|m| m.first_name().to_string()).collect()
}

#[test]
fn import_filter_and_search() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.csv");
    fs::write(&path, ROSTER).unwrap();

    let mut list = RecordList::new();
    let report = import_members(&mut list, &path).unwrap();
    assert_eq!(report.imported, 3);
    assert!(report.row_errors.is_empty());

    let names: Vec<&str> = list.members().iter().map(|m| m.first_name()).collect();
    assert_eq!(names, vec!["Alice", "Amy", "Bob"]);

    list.filter_by_grade(10);
    assert_eq!(first_names(&list.filtered_members()), vec!["Alice"]);
    assert_eq!(list.filtered_index(), &[0]);

    list.reset_filters();
    assert!(list.search("am").is_empty());
    assert_eq!(first_names(&list.search("amy")), vec!["Amy"]);
}

#[test]
fn export_then_import_restores_roster() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("roster.csv");
    let target = dir.path().join("nested").join("storage.csv");
    fs::write(&source, ROSTER).unwrap();

    let mut list = RecordList::new();
    import_members(&mut list, &source).unwrap();
    list.filter_by_grade(9);
    export_members(&list, &target).unwrap();

    // Export covers the whole roster, not the filtered view
    let mut restored = RecordList::new();
    let report = import_members(&mut restored, &target).unwrap();
    assert_eq!(report.imported, 3);
    assert_eq!(restored.members(), list.members());
}

#[test]
fn import_reports_bad_rows_and_keeps_good_ones() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.csv");
    fs::write(
        &path,
        "First Name,Last Name,Email,Grade\nAlice,Smith,a@x.com,10\nBob\nCarl,Diaz,c@x.com,tenth\n",
    )
    .unwrap();

    let mut list = RecordList::new();
    let report = import_members(&mut list, &path).unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(list.len(), 1);
    let kinds: Vec<&RowErrorKind> = report.row_errors.iter().map(|e| &e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &RowErrorKind::TooFewFields { found: 1 },
            &RowErrorKind::InvalidGrade {
                value: "tenth".to_string()
            },
        ]
    );
}

#[test]
fn import_missing_file_is_an_operation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.csv");

    let mut list = RecordList::new();
    let result = import_members(&mut list, &path);
    assert!(matches!(result, Err(StorageError::Open { .. })));
    assert!(list.is_empty());
}

#[test]
fn export_to_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let list = RecordList::new();
    let result = export_members(&list, dir.path());
    assert!(matches!(result, Err(StorageError::Create { .. })));
}

#[test]
fn delete_after_import_then_readd() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.csv");
    fs::write(&path, ROSTER).unwrap();

    let mut list = RecordList::new();
    import_members(&mut list, &path).unwrap();

    let bob = Member::new("Bob", "Jones", "b@x.com", 11, "Marketing", "FTDM");
    assert!(list.delete_member(&bob));
    assert_eq!(list.len(), 2);
    assert!(!list.delete_member(&bob));

    list.add_member(bob);
    assert_eq!(list.len(), 3);
}
