//! Integration tests for the built-in lint rules (Sprint 2)
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn write_fixture(dir: &tempfile::TempDir, name: &str, code: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, code).unwrap();
    path
}

#[test]
fn test_too_many_params_rule() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        &dir,
        "params.cpp",
        "int add(int x, int y, float z) { return 0; }\n",
    );

    // three parameters pass the default budget of four
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg(dir.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("too_many_params_in_func").not());

    // and fail a budget of two
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg(dir.path()).arg("--max-params").arg("2");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("CPP-000001"))
        .stdout(predicate::str::contains("3 params found"));
}

#[test]
fn test_too_long_body_rule() {
    let dir = tempfile::tempdir().unwrap();
    let mut code = String::from("void f() {\n");
    for i in 0..8 {
        code.push_str(&format!("    g({i});\n"));
    }
    code.push_str("}\n");
    write_fixture(&dir, "long.cpp", &code);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg(dir.path()).arg("--max-body-lines").arg("4");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("CPP-000000"))
        .stdout(predicate::str::contains("too long function body: 9 lines"));
}

#[test]
fn test_body_rule_disabled_by_zero() {
    let dir = tempfile::tempdir().unwrap();
    let mut code = String::from("void f() {\n");
    for i in 0..30 {
        code.push_str(&format!("    g({i});\n"));
    }
    code.push_str("}\n");
    write_fixture(&dir, "long.cpp", &code);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg(dir.path()).arg("--max-body-lines").arg("0");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("too_long_func_body").not());
}

#[test]
fn test_magic_number_rule_and_ignore_list() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(&dir, "magic.cpp", "int f() { return g(1337); }\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg(dir.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("magic number 1337 should not be used"));

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg(dir.path()).arg("--ignore-numbers").arg("1337");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("magic_number_usage").not());
}

#[test]
fn test_magic_number_ignores_initializers() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        &dir,
        "init.cpp",
        "void f() { int threshold = 1337; g(threshold); }\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg(dir.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("magic_number_usage").not());
}

#[test]
fn test_summary_mode_table() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        &dir,
        "mixed.cpp",
        "int f() { return g(1337) + g(8191); }\nint h(int a, int b, int c) { return 0; }\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg(dir.path()).arg("-c").arg("--max-params").arg("2");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("% total"))
        .stdout(predicate::str::contains("magic_number_usage (CPP-000003)"))
        .stdout(predicate::str::contains("too_many_params_in_func (CPP-000001)"))
        .stdout(predicate::str::contains("total"));
}

#[test]
fn test_diagnostic_line_carries_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "pos.cpp", "int f() {\n    return g(1337);\n}\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("revisar");
    cmd.arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pos.cpp:2:14 [CPP-000003]"));
}
