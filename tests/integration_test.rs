//! Integration tests for the redecard-split CLI.
//!
//! These tests run the actual binary against the sample files in
//! `tests/data` and inspect the per-merchant files it writes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary on the given inputs and return stdout
fn run_split(output_dir: &Path, inputs: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("redecard-split").unwrap();
    cmd.arg("-o").arg(output_dir);
    for input in inputs {
        cmd.arg(test_data_path(input));
    }
    let assert = cmd.assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

/// Sorted file names in a directory
fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_credit_sales_sample() {
    let out = tempdir().unwrap();
    run_split(out.path(), &["EEVC_sample.txt"]);

    assert_eq!(
        file_names(out.path()),
        vec![
            "000000123_EEVC_150324_042.txt",
            "000000456_EEVC_150324_042.txt"
        ]
    );

    let written = fs::read_to_string(out.path().join("000000123_EEVC_150324_042.txt")).unwrap();
    let expected =
        fs::read_to_string(test_data_path("expected_000000123_EEVC_150324_042.txt")).unwrap();
    assert_eq!(written, expected);
}

#[test]
fn test_debit_sales_sample() {
    let out = tempdir().unwrap();
    run_split(out.path(), &["EEVD_sample.csv"]);

    assert_eq!(
        file_names(out.path()),
        vec![
            "000000123_EEVD_150324_051.txt",
            "000000456_EEVD_150324_051.txt"
        ]
    );

    let written = fs::read_to_string(out.path().join("000000456_EEVD_150324_051.txt")).unwrap();
    let expected =
        fs::read_to_string(test_data_path("expected_000000456_EEVD_150324_051.txt")).unwrap();
    assert_eq!(written, expected);
}

#[test]
fn test_financial_settlement_sample() {
    let out = tempdir().unwrap();
    run_split(out.path(), &["EEFI_sample.txt"]);

    assert_eq!(
        file_names(out.path()),
        vec![
            "000000123_EEFI_150324_007.txt",
            "000000456_EEFI_150324_007.txt"
        ]
    );

    let written = fs::read_to_string(out.path().join("000000123_EEFI_150324_007.txt")).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("03015032024"));
    assert!(lines[1].starts_with("040000000123CREDITO"));
    assert!(lines[2].starts_with("040000000123AJUSTE"));
    assert!(lines[3].starts_with("050"));
}

#[test]
fn test_manifest_lists_every_file() {
    let out = tempdir().unwrap();
    let stdout = run_split(out.path(), &["EEVC_sample.txt", "EEVD_sample.csv"]);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "source,format,merchant,lines,path");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].contains(",EEVC,000000123,6,"));
    assert!(lines[2].contains(",EEVC,000000456,5,"));
    assert!(lines[3].contains(",EEVD,000000123,4,"));
}

#[test]
fn test_empty_file_produces_nothing() {
    let out = tempdir().unwrap();
    let stdout = run_split(out.path(), &["empty_EEVC.txt"]);

    assert_eq!(stdout.trim(), "source,format,merchant,lines,path");
    assert!(file_names(out.path()).is_empty());
}

#[test]
fn test_unrecognized_file_is_reported() {
    let out = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("redecard-split").unwrap();
    cmd.arg("-o")
        .arg(out.path())
        .arg(test_data_path("unknown.txt"))
        .assert()
        .success()
        .stderr(predicate::str::contains("unrecognized"));

    assert!(file_names(out.path()).is_empty());
}

#[test]
fn test_missing_file_error() {
    let out = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("redecard-split").unwrap();
    cmd.arg("-o")
        .arg(out.path())
        .arg("nonexistent_EEVC.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("redecard-split").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}

#[test]
fn test_layout_file_overrides_debit_columns() {
    let out = tempdir().unwrap();
    let layout = out.path().join("layout.json");
    fs::write(
        &layout,
        r#"{ "debit": { "headers": [{ "name": "emission", "date_field": 2, "sequence_field": 7 }] } }"#,
    )
    .unwrap();
    let target = out.path().join("split");

    let mut cmd = Command::cargo_bin("redecard-split").unwrap();
    cmd.arg("-o")
        .arg(&target)
        .arg("--layout-file")
        .arg(&layout)
        .arg(test_data_path("EEVD_sample.csv"))
        .assert()
        .success();

    assert!(target.join("000000123_EEVD_160324_051.txt").exists());
}

#[test]
fn test_invalid_layout_file_error() {
    let out = tempdir().unwrap();
    let layout = out.path().join("layout.json");
    fs::write(&layout, "{ broken").unwrap();

    let mut cmd = Command::cargo_bin("redecard-split").unwrap();
    cmd.arg("--layout-file")
        .arg(&layout)
        .arg(test_data_path("EEVD_sample.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid layout configuration"));
}

#[test]
fn test_strict_utf8_rejects_invalid_bytes() {
    let out = tempdir().unwrap();
    let input = out.path().join("bad_EEVD.csv");
    fs::write(&input, b"00,H\n01,1,caf\xe9\n04,T\n").unwrap();

    let mut cmd = Command::cargo_bin("redecard-split").unwrap();
    cmd.arg("-o")
        .arg(out.path().join("split"))
        .arg("--strict-utf8")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid UTF-8"));
}
