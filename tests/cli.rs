use std::{fs, path::PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/abs_2007.10866.html")
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("arxiv-crawler").expect("binary");
    cmd.env("NO_COLOR", "1");
    cmd
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8(strip_ansi_escapes::strip(&output.stderr)).expect("utf8 stderr")
}

#[test]
fn subjects_lists_registry() {
    cmd()
        .arg("subjects")
        .assert()
        .success()
        .stdout(predicate::str::contains("cs.CL\tComputation and Language"))
        .stdout(predicate::str::contains("cs.SY\tSystems and Control"))
        .stdout(predicate::function(|s: &str| s.lines().count() == 40));
}

#[test]
fn list_unknown_subject_fails_fast() {
    // Rejected before any request, so this needs no network.
    cmd()
        .args(["list", "cs.ZZ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Subject Not Found"))
        .stderr(predicate::str::contains("cs.ZZ"));
}

#[test]
fn fetch_saved_page_as_json() -> Result<(), Box<dyn std::error::Error>> {
    let output = cmd().arg("fetch").arg(fixture()).output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout.clone())?;
    let stderr = stderr_of(&output);

    let value: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["identifier"], "2007.10866");
    assert_eq!(value["title"], "Neural Parsing of Preprint Pages");
    assert_eq!(value["authors"][1], "Alan Turing");
    assert_eq!(value["submission_date"], "2020-07-21");
    assert_eq!(value["subjects"], serde_json::json!(["cs.CL", "cs.IR"]));
    assert_eq!(value["comments"], "8 pages, 2 figures");
    assert!(value["abstract"].as_str().unwrap().contains("records & report"));
    assert!(
        stderr.contains("✓ 1") && stderr.contains("✗ 0"),
        "stderr summary mismatch. stderr=\n{}",
        stderr
    );
    Ok(())
}

#[test]
fn fetch_saved_page_as_biblatex_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("out.bib");
    cmd()
        .arg("fetch")
        .arg(fixture())
        .args(["--format", "biblatex", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let bib = fs::read_to_string(&out)?;
    assert!(bib.contains("@online"), "{bib}");
    assert!(bib.contains("arXiv:2007.10866"), "{bib}");
    assert!(bib.contains("Computer Science - Information Retrieval"), "{bib}");
    Ok(())
}

#[test]
fn fetch_reports_invalid_record_and_continues() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let bad = dir.path().join("bad.html");
    let html = fs::read_to_string(fixture())?.replace("21 Jul 2020", "21 Aug 2020");
    fs::write(&bad, html)?;

    let output = cmd().arg("fetch").arg(&bad).arg(fixture()).output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout.clone())?;
    let stderr = stderr_of(&output);
    assert!(stdout.contains("\"2007.10866\""), "stdout=\n{}", stdout);
    assert!(stderr.contains("Article SubmitDate Format Error!"), "stderr=\n{}", stderr);
    assert!(
        stderr.contains("✓ 1") && stderr.contains("✗ 1"),
        "stderr summary mismatch. stderr=\n{}",
        stderr
    );
    Ok(())
}

#[test]
fn fetch_invalid_identifier() -> Result<(), Box<dyn std::error::Error>> {
    let output = cmd().arg("fetch").arg("this-is-not-an-id").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout.clone())?;
    let stderr = stderr_of(&output);
    assert!(stdout.is_empty(), "stdout should be empty, got=\n{}", stdout);
    assert!(
        stderr.contains("unrecognised identifier: this-is-not-an-id")
            && stderr.contains("✓ 0")
            && stderr.contains("✗ 1"),
        "stderr mismatch. stderr=\n{}",
        stderr
    );
    Ok(())
}

#[test]
fn fetch_biblatex_with_latex_fragments_in_abstract() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let latex = dir.path().join("latex.html");
    let html = fs::read_to_string(fixture())?.replace(
        "records &amp; report on its accuracy.",
        r"records \} for a set \{1, 2 at $O(n cost \",
    );
    fs::write(&latex, html)?;

    let output = cmd()
        .arg("fetch")
        .arg(&latex)
        .arg(fixture())
        .args(["--format", "biblatex"])
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout.clone())?;
    let stderr = stderr_of(&output);
    assert_eq!(stdout.matches("@online").count(), 2, "stdout=\n{}", stdout);
    assert!(
        stderr.contains("✓ 2") && stderr.contains("✗ 0"),
        "stderr summary mismatch. stderr=\n{}",
        stderr
    );
    Ok(())
}
