//! End-to-end tests for the `mdsheet` binary

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_help() {
    cargo_bin_cmd!("mdsheet")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert Markdown files to Excel"));
}

#[test]
fn test_missing_input_argument() {
    cargo_bin_cmd!("mdsheet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_default_output_path() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.md");
    fs::write(&input, "# Heading\n\nParagraph with **bold** text.").unwrap();

    cargo_bin_cmd!("mdsheet")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"))
        .stdout(predicate::str::contains("doc.xlsx"));

    let bytes = fs::read(temp_dir.path().join("doc.xlsx")).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_explicit_output_and_config() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.md");
    let output = temp_dir.path().join("sheet.xlsx");
    let config = temp_dir.path().join("mdsheet.toml");
    fs::write(&input, "- one\n- two\n\n[link](http://example.com)").unwrap();
    fs::write(&config, "[layout]\nbullet = \"- \"\ncolumn_width = 60.0\n").unwrap();

    cargo_bin_cmd!("mdsheet")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .args(["--row", "2", "--column", "3"])
        .assert()
        .success();

    assert!(output.exists());
    assert!(!temp_dir.path().join("doc.xlsx").exists());
}

#[test]
fn test_unreadable_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("nope.md");

    cargo_bin_cmd!("mdsheet")
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to read"))
        .stderr(predicate::str::contains("nope.md"));
}

#[test]
fn test_unwritable_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.md");
    let output = temp_dir.path().join("no_such_dir").join("out.xlsx");
    fs::write(&input, "text").unwrap();

    cargo_bin_cmd!("mdsheet")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to write"));

    assert!(!output.exists());
}

#[test]
fn test_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.md");
    let config = temp_dir.path().join("bad.toml");
    fs::write(&input, "text").unwrap();
    fs::write(&config, "[quote]\nfill = \"purple\"\n").unwrap();

    cargo_bin_cmd!("mdsheet")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn test_row_outside_worksheet_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.md");
    fs::write(&input, "text").unwrap();

    for row in ["0", "4294967295"] {
        cargo_bin_cmd!("mdsheet")
            .arg(&input)
            .arg("--row")
            .arg(row)
            .assert()
            .failure()
            .stderr(predicate::str::contains("--row"));
    }
    assert!(!temp_dir.path().join("doc.xlsx").exists());
}

#[test]
fn test_out_of_range_config_layout() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("doc.md");
    let config = temp_dir.path().join("layout.toml");
    fs::write(&input, "text").unwrap();
    fs::write(&config, "[layout]\nstart_row = 4294967295\n").unwrap();

    cargo_bin_cmd!("mdsheet")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config file"));
}
