#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::folio_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn help_lists_commands() {
    folio_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("outline"))
        .stdout(predicate::str::contains("section"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn version_prints_package_version() {
    folio_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_file_is_reported() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nope.pdf");

    folio_cmd()
        .args(["outline", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn non_pdf_input_fails_to_decode() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("notes.pdf");
    std::fs::write(&path, b"this is not a pdf").unwrap();

    folio_cmd()
        .args(["info", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decode error"));
}

#[test]
fn invalid_config_is_reported() {
    let tmp = tempdir().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "[pagination]\nchar_budget = 0\n").unwrap();

    folio_cmd()
        .env("FOLIO_CONFIG_DIR", tmp.path())
        .args(["outline", "anything.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}
