//! Integration tests for the CLI interface
//!
//! Tests argument parsing, the plan output and the stdin splitter

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cutbench(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cutbench").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("CUTBENCH_COMMAND")
        .env_remove("CUTBENCH_OUTPUT_ROOT")
        .env_remove("CUTBENCH_ITERATIONS")
        .env_remove("CUTBENCH_TIMEOUT");
    cmd
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = Command::cargo_bin("cutbench").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("split"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("cutbench").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_run_rejects_invalid_size() {
    let mut cmd = Command::cargo_bin("cutbench").unwrap();
    cmd.args(["run", "-s", "twelve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_plan_defaults() {
    let temp = TempDir::new().unwrap();
    cutbench(&temp)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("x 2 iterations"))
        .stdout(predicate::str::contains("supremacy_12"));
}

#[test]
fn test_plan_with_overrides_as_json() {
    let temp = TempDir::new().unwrap();
    let output = cutbench(&temp)
        .args(["plan", "--json", "-t", "bv", "-t", "adder", "-s", "6", "-n", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["iterations"], 3);
    let runs = plan["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["circuit_type"], "bv");
    assert_eq!(runs[1]["circuit_type"], "adder");
    assert_eq!(runs[1]["circuit_size"], 6);
}

#[test]
fn test_plan_reads_config_file_from_working_dir() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("cutbench.toml"),
        "circuit_types = [\"hwea\"]\ncircuit_sizes = [4, 5]\n",
    )
    .unwrap();

    cutbench(&temp)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 run configurations"))
        .stdout(predicate::str::contains("hwea_5"));
}

#[test]
fn test_plan_rejects_zero_iterations() {
    let temp = TempDir::new().unwrap();
    cutbench(&temp)
        .args(["plan", "-n", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("iterations must be at least 1"));
}

#[test]
fn test_split_routes_stdin() {
    let temp = TempDir::new().unwrap();
    let primary = temp.path().join("cutqc.txt");
    let secondary = temp.path().join("mlft.txt");

    cutbench(&temp)
        .arg("split")
        .arg("--primary")
        .arg(&primary)
        .arg("--secondary")
        .arg(&secondary)
        .write_stdin("a\nb\nStart MLFT\nc\nStart MLFT\nd")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&primary).unwrap(), "a\nb\n");
    assert_eq!(
        fs::read_to_string(&secondary).unwrap(),
        "c\nStart MLFT\nd\n"
    );
}

#[test]
fn test_split_appends_on_repeated_runs() {
    let temp = TempDir::new().unwrap();
    let primary = temp.path().join("p.txt");
    let secondary = temp.path().join("s.txt");

    for input in ["x\n", "y\n"] {
        cutbench(&temp)
            .arg("split")
            .arg("--primary")
            .arg(&primary)
            .arg("--secondary")
            .arg(&secondary)
            .write_stdin(input)
            .assert()
            .success();
    }

    assert_eq!(fs::read_to_string(&primary).unwrap(), "x\ny\n");
    assert_eq!(fs::read_to_string(&secondary).unwrap(), "");
}

#[test]
fn test_split_custom_sentinel() {
    let temp = TempDir::new().unwrap();
    let primary = temp.path().join("p.txt");
    let secondary = temp.path().join("s.txt");

    cutbench(&temp)
        .arg("split")
        .arg("--primary")
        .arg(&primary)
        .arg("--secondary")
        .arg(&secondary)
        .args(["--sentinel", "== phase 2 =="])
        .write_stdin("one\n== phase 2 ==\ntwo\n")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&primary).unwrap(), "one\n");
    assert_eq!(fs::read_to_string(&secondary).unwrap(), "two\n");
}

#[test]
fn test_split_rejects_empty_sentinel() {
    let temp = TempDir::new().unwrap();
    let primary = temp.path().join("cutqc.txt");
    let secondary = temp.path().join("mlft.txt");

    cutbench(&temp)
        .arg("split")
        .arg("--primary")
        .arg(&primary)
        .arg("--secondary")
        .arg(&secondary)
        .args(["--sentinel", ""])
        .write_stdin("a\n\nb\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));

    assert!(!primary.exists());
    assert!(!secondary.exists());
}
