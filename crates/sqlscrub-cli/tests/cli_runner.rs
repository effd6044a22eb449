//! Tests of the directory runner against real files on disk.

use std::fs;

use sqlscrub_cli::{process_file, run, FileOutcome, Options, ScrubError};
use sqlscrub_core::TargetTables;

fn targets(names: &[&str]) -> TargetTables {
    TargetTables::new(names.iter().copied())
}

#[test]
fn rewrites_files_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.sql");
    fs::write(
        &path,
        "INSERT INTO users (id) VALUES (1);\nINSERT INTO product (id) VALUES (2);",
    )
    .unwrap();

    let outcome = process_file(&path, &targets(&["users"]), Options::default()).unwrap();
    assert_eq!(outcome, FileOutcome::Rewritten);

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "INSERT INTO product (id) VALUES (2);");
}

#[test]
fn emptied_files_get_a_placeholder_comment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.sql");
    fs::write(&path, "INSERT INTO users (id) VALUES (1);").unwrap();

    let outcome = process_file(&path, &targets(&["users"]), Options::default()).unwrap();
    assert_eq!(outcome, FileOutcome::Rewritten);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("-- All content was removed"));
    assert!(content.contains("users"));
}

#[test]
fn files_without_mentions_are_skipped_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.sql");
    let original = "-- keep me\nINSERT INTO product (id)\nVALUES (1);\n";
    fs::write(&path, original).unwrap();

    let outcome = process_file(&path, &targets(&["users"]), Options::default()).unwrap();
    assert_eq!(outcome, FileOutcome::Skipped);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.sql");
    let original = "INSERT INTO users (id) VALUES (1);";
    fs::write(&path, original).unwrap();

    let outcome = process_file(&path, &targets(&["users"]), Options { dry_run: true }).unwrap();
    assert_eq!(outcome, FileOutcome::Rewritten);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn run_counts_outcomes_across_a_tree() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(
        dir.path().join("a.sql"),
        "INSERT INTO users (id) VALUES (1);",
    )
    .unwrap();
    fs::write(
        dir.path().join("nested/b.sql"),
        "INSERT INTO product (id) VALUES (1);",
    )
    .unwrap();
    fs::write(dir.path().join("readme.txt"), "not sql").unwrap();

    let summary = run(dir.path(), &targets(&["users"]), Options::default()).unwrap();
    assert_eq!(summary.rewritten, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.unchanged, 0);
    assert_eq!(summary.failed, 0);
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let result = run(&missing, &targets(&["users"]), Options::default());
    assert!(matches!(result, Err(ScrubError::DirectoryNotFound(_))));
}
