//! Integration tests for --self-check over the embedded samples (Sprint 7)
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

use predicates::prelude::*;

#[test]
fn test_self_check_finds_known_diagnostics() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg("--self-check");

    // both embedded samples carry the bare 100.0 threshold in add()
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Hello, revisar."))
        .stdout(predicate::str::contains("magic number 100.0 should not be used"))
        .stdout(predicate::str::contains("Find 1 errors in: <sample:basic.cpp>"))
        .stdout(predicate::str::contains("Find 1 errors in: <sample:node.cpp>"))
        .stdout(predicate::str::contains("2 pass; 0 fail; 100% using"));
}

#[test]
fn test_self_check_json() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg("--self-check").arg("--format").arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(parsed["summary"]["files_checked"], 2);
    assert_eq!(parsed["summary"]["files_failed"], 0);
    let diagnostics = parsed["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .all(|d| d["rule_name"] == "magic_number_usage"));
}

#[test]
fn test_self_check_respects_filter() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg("--self-check").arg("-e").arg("rules=too_long_func_body");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("magic_number_usage").not())
        .stdout(predicate::str::contains("2 pass; 0 fail;"));
}

#[test]
fn test_self_check_dump_ast_contains_samples() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg("--self-check").arg("--dump-ast");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<sample:basic.cpp>"));
    assert!(stdout.contains("<sample:node.cpp>"));
    assert!(stdout.contains("ClassDecl"));
}
