#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::{folio_cmd, guide_pdf, write_pdf};
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn run_json(args: &[&str]) -> Value {
    let stdout = folio_cmd()
        .args(args)
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&stdout).expect("stdout should be JSON")
}

#[test]
fn outline_lists_headings_with_pages() {
    let tmp = tempdir().unwrap();
    let pdf = guide_pdf(tmp.path());

    folio_cmd()
        .args(["outline", pdf.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Introduction (p. 1)"))
        .stdout(predicate::str::contains("- Installation (p. 2)"))
        .stdout(predicate::str::contains("- Usage (p. 3)"));
}

#[test]
fn outline_without_bookmarks() {
    let tmp = tempdir().unwrap();
    let pdf = write_pdf(tmp.path(), "plain.pdf", &["Just text"], &[]);

    folio_cmd()
        .args(["outline", pdf.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No outline available"));
}

#[test]
fn section_by_partial_title() {
    let tmp = tempdir().unwrap();
    let pdf = guide_pdf(tmp.path());

    let section = run_json(&["section", pdf.to_str().unwrap(), "install"]);
    assert_eq!(section["section"], "Installation");
    assert_eq!(section["page"], 1);
    assert_eq!(section["totalPages"], 1);
    let content = section["content"].as_str().unwrap();
    assert!(content.starts_with("## Installation"));
    assert!(content.contains("Install the widget with care"));
    assert!(!content.contains("Use the widget daily"));
}

#[test]
fn unknown_section_lists_available_headings() {
    let tmp = tempdir().unwrap();
    let pdf = guide_pdf(tmp.path());

    folio_cmd()
        .args(["section", pdf.to_str().unwrap(), "appendix"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'appendix' not found"))
        .stderr(predicate::str::contains("Installation"));
}

#[test]
fn section_page_out_of_range() {
    let tmp = tempdir().unwrap();
    let pdf = guide_pdf(tmp.path());

    folio_cmd()
        .args(["section", pdf.to_str().unwrap(), "Usage", "--page", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn search_groups_matches_by_section() {
    let tmp = tempdir().unwrap();
    let pdf = guide_pdf(tmp.path());

    let result = run_json(&["search", pdf.to_str().unwrap(), "WIDGET"]);
    assert_eq!(result["totalMatches"], 2);
    let sections: Vec<&str> = result["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["section"].as_str().unwrap())
        .collect();
    assert_eq!(sections, vec!["Installation", "Usage"]);
    assert_eq!(result["groups"][0]["matches"][0]["text"], "widget");
}

#[test]
fn search_respects_limit_and_case() {
    let tmp = tempdir().unwrap();
    let pdf = guide_pdf(tmp.path());

    let limited = run_json(&["search", pdf.to_str().unwrap(), "widget", "-n", "1"]);
    assert_eq!(limited["totalMatches"], 1);

    let none = run_json(&["search", pdf.to_str().unwrap(), "WIDGET", "--case-sensitive"]);
    assert_eq!(none["totalMatches"], 0);
}

#[test]
fn search_rejects_invalid_regex() {
    let tmp = tempdir().unwrap();
    let pdf = guide_pdf(tmp.path());

    folio_cmd()
        .args(["search", pdf.to_str().unwrap(), "(unclosed", "--regex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern"));
}

#[test]
fn search_text_output_summarizes() {
    let tmp = tempdir().unwrap();
    let pdf = guide_pdf(tmp.path());

    folio_cmd()
        .args(["search", pdf.to_str().unwrap(), "widget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 matches in 2 sections"));
}

#[test]
fn info_reports_pages_and_metadata() {
    let tmp = tempdir().unwrap();
    let pdf = guide_pdf(tmp.path());

    let info = run_json(&["info", pdf.to_str().unwrap()]);
    assert_eq!(info["id"], "guide.pdf");
    assert_eq!(info["pageCount"], 3);
    assert_eq!(info["metadata"]["Title"], "Widget Guide");
    assert_eq!(info["metadata"]["Author"], "Folio Tests");
    assert!(info["issues"].as_array().unwrap().is_empty());
}
