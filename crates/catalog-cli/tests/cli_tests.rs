//! Integration tests for the catalog-search binary.
//!
//! Each test runs the built executable against a temporary data directory.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const PRICE_INDEX: &str = r#"{
    "A1": ["Consumer Price Index", "MONTHLY", "2003-01", "2024-01"],
    "A2": ["Producer Price Index", "MONTHLY", "2005-01", "2024-01"],
    "B7": ["Gold Reserves", "WEEKLY", "2010-01", "2024-01"]
}"#;

fn run(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_catalog-search"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()
        .expect("Failed to run catalog-search")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Data directory with the price index installed for English.
fn create_test_env() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(
        temp_dir.path().join("catalog_index_en.json"),
        PRICE_INDEX,
    )
    .unwrap();
    temp_dir
}

#[test]
fn test_search_prints_table() {
    let env = create_test_env();
    let output = run(env.path(), &["--locale", "EN", "search", "price", "index"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Code"));
    assert!(out.contains("Start Date"));
    let a1 = out.find("A1").unwrap();
    let a2 = out.find("A2").unwrap();
    assert!(a1 < a2);
    assert!(!out.contains("B7"));
}

#[test]
fn test_search_quiet_lists_codes() {
    let env = create_test_env();
    let output = run(
        env.path(),
        &["--locale", "EN", "search", "--quiet", "-n", "1", "price"],
    );

    assert!(output.status.success());
    assert_eq!(stdout(&output), "A1\n");
}

#[test]
fn test_search_without_index_is_not_an_error() {
    let env = TempDir::new().unwrap();
    let output = run(env.path(), &["--locale", "TR", "search", "fiyat"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("No results."));
    assert!(stderr(&output).contains("no index found"));
}

#[test]
fn test_blank_keyword_is_a_usage_error() {
    let env = create_test_env();
    let output = run(env.path(), &["--locale", "EN", "search", "  "]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("keyword can not be empty"));
}

#[test]
fn test_unknown_locale_is_a_usage_error() {
    let env = create_test_env();
    let output = run(env.path(), &["--locale", "DE", "search", "price"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("DE is not a defined locale"));
}

#[test]
fn test_corrupt_index_is_removed() {
    let env = TempDir::new().unwrap();
    let path = env.path().join("catalog_index_en.json");
    std::fs::write(&path, "{ not json").unwrap();

    let output = run(env.path(), &["--locale", "EN", "search", "price"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No results."));
    assert!(!path.exists());
}

#[test]
fn test_age_reports_missing_and_fresh_index() {
    let env = TempDir::new().unwrap();
    let output = run(env.path(), &["--locale", "EN", "age"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No ENG index"));

    let env = create_test_env();
    let output = run(env.path(), &["--locale", "EN", "age"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("ENG index is 0 days old"));
}

#[test]
fn test_install_then_search() {
    let source = TempDir::new().unwrap();
    let file = source.path().join("built.json");
    std::fs::write(&file, PRICE_INDEX).unwrap();

    let env = TempDir::new().unwrap();
    let output = run(
        env.path(),
        &["--locale", "TR", "install", file.to_str().unwrap()],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Installed 3 entries"));
    assert!(env.path().join("catalog_index_tr.json").exists());

    let output = run(env.path(), &["search", "-q", "gold"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "B7\n");
}

#[test]
fn test_install_rejects_bad_document() {
    let source = TempDir::new().unwrap();
    let file = source.path().join("broken.json");
    std::fs::write(&file, "[1, 2, 3]").unwrap();

    let env = TempDir::new().unwrap();
    let output = run(env.path(), &["install", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!env.path().join("catalog_index_tr.json").exists());
    // The source file is left alone.
    assert!(file.exists());
}
