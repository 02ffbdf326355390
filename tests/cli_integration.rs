//! Integration tests for the Loiter CLI

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the loiter binary
fn loiter() -> Command {
    Command::new(cargo::cargo_bin!("loiter"))
}

#[test]
fn test_help() {
    loiter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Presence simulation bot"));
}

#[test]
fn test_version() {
    loiter()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_run_requires_hint() {
    loiter().arg("run").assert().failure();
}

#[test]
fn test_run_with_extensionless_hint_is_notice() {
    let temp = TempDir::new().unwrap();

    loiter()
        .arg("run")
        .arg("Makefile")
        .arg("--workspace")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid input"));
}

#[test]
fn test_run_with_no_matching_files_exits_nonzero() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("code.rs"), "fn main() {}\n").unwrap();

    loiter()
        .arg("run")
        .arg("notes.txt")
        .arg("--workspace")
        .arg(temp.path())
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn test_run_with_missing_workspace_fails() {
    loiter()
        .arg("run")
        .arg("a.txt")
        .arg("--workspace")
        .arg("/definitely/not/a/real/dir")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
