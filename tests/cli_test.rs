//! Integration tests for the pertsim binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a pertsim command in a directory
fn pertsim_in(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("pertsim").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_text_report_for_task_lines() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "plan.txt", "T1, Design, 5, 5, 5\n");

    pertsim_in(dir.path())
        .args(["plan.txt", "--trials", "1", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tasks: 1"))
        .stdout(predicate::str::contains("Mean: 5.00 hours"))
        .stdout(predicate::str::contains("Sprint points: 2"));
}

#[test]
fn test_json_report_with_samples() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "pertsim.yml",
        "tasks:\n  - { id: A, optimistic: 1, likely: 2, pessimistic: 3 }\n  - { id: B, optimistic: 1, likely: 2, pessimistic: 3, depends_on: [A] }\n",
    );

    let output = pertsim_in(dir.path())
        .args(["--json", "--samples", "--trials", "250", "--seed", "4"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["result"]["num_tasks"], 2);
    assert_eq!(value["result"]["num_trials"], 250);
    assert_eq!(value["samples"].as_array().unwrap().len(), 250);
    assert_eq!(value["critical_path"], serde_json::json!(["A", "B"]));
}

#[test]
fn test_invalid_parameters_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "plan.txt", "T1, Only, 2, 2, 2\n");

    let output = pertsim_in(dir.path())
        .args(["plan.txt", "--json", "--trials", "-3", "--velocity", "abc"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["result"]["num_trials"], 10000);
    assert_eq!(value["result"]["velocity_factor"], 1.0);
}

#[test]
fn test_cycle_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "plan.txt", "A, First, 1, 2, 3, B\nB, Second, 1, 2, 3, A\n");

    pertsim_in(dir.path())
        .arg("plan.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dependency cycle detected"));
}

#[test]
fn test_no_valid_tasks_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "plan.txt", "garbage\nA, First, 3, 2, 1\n");

    pertsim_in(dir.path())
        .arg("plan.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid tasks"));
}

#[test]
fn test_sprint_hours_flag() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "plan.txt", "T1, Only, 6, 6, 6\n");

    pertsim_in(dir.path())
        .args(["plan.txt", "--trials", "1", "--sprint-hours", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sprint points: 3"));

    for raw in ["lots", "-1", "0"] {
        pertsim_in(dir.path())
            .args(["plan.txt", "--trials", "1", "--sprint-hours", raw])
            .assert()
            .success()
            .stdout(predicate::str::contains("Sprint points: 2"));
    }
}

#[test]
fn test_overflowing_velocity_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "plan.txt", "T1, Only, 5, 5, 5\n");

    pertsim_in(dir.path())
        .args(["plan.txt", "--trials", "4", "--velocity", "1e308"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("numeric overflow"));
}
