//! Integration tests for the `aduana` binary over OCR text inputs.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RECEIPT: &str = "Comprobante de Pago\nFolio 4560010758\nTotal Pagado 8.153.962\nRUT 76.123.456-0\n";

/// CLI command isolated from any user configuration.
fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_aduana"));
    cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_process_text_as_json() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "receipt.txt", RECEIPT);

    cli(dir.path())
        .args(["process", "-k", "comprobante"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"numero_folio\":\"4560010758\""))
        .stdout(predicate::str::contains("\"valid\":true"));
}

#[test]
fn test_process_text_format() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "receipt.txt", RECEIPT);

    cli(dir.path())
        .args(["process", "-k", "comprobante-transaccion", "-f", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("numero_folio: 4560010758"))
        .stdout(predicate::str::contains("Valid: yes"));
}

#[test]
fn test_process_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "receipt.txt", RECEIPT);
    let output = dir.path().join("receipt.csv");

    cli(dir.path())
        .args(["process", "-k", "comprobante", "-f", "csv", "-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("numero_folio,total_pagado"));
}

#[test]
fn test_process_missing_file() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .args(["process", "-k", "comprobante"])
        .arg(dir.path().join("nope.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_process_unknown_kind() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "receipt.txt", RECEIPT);

    cli(dir.path())
        .args(["process", "-k", "factura"])
        .arg(&input)
        .assert()
        .failure();
}

#[test]
fn test_strict_fails_on_invalid_document() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "partial.txt", "Folio 4560010758\n");

    cli(dir.path())
        .args(["process", "-k", "comprobante"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\":false"));

    cli(dir.path())
        .args(["process", "-k", "comprobante", "--strict"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Document is invalid"));
}

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.txt", RECEIPT);
    write(&dir, "b.txt", "Folio 4560010758\n");
    let output_dir = dir.path().join("out");
    let pattern = format!("{}/*.txt", dir.path().display());

    cli(dir.path())
        .args(["batch", "-k", "comprobante", "--summary", "-o"])
        .arg(&output_dir)
        .arg(&pattern)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 valid, 1 incomplete, 0 failed"));

    assert!(output_dir.join("a.json").exists());
    assert!(output_dir.join("b.json").exists());

    let summary = fs::read_to_string(output_dir.join("summary.csv")).unwrap();
    let mut lines = summary.lines();
    assert!(lines.next().unwrap().starts_with("filename,status,document_type,valid"));
    assert!(lines
        .next()
        .unwrap()
        .starts_with("a.txt,success,comprobante-transaccion,true"));
}

#[test]
fn test_batch_without_matches() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.txt", dir.path().display());

    cli(dir.path())
        .args(["batch", "-k", "guia"])
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_config_init_and_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "extraction.text_confidence"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.8"));
}

#[test]
fn test_config_path() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file:"));
}
