use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use soft_deadlines::task::Task;

fn sdm(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sdm").expect("binary");
    cmd.env_remove("RUST_LOG")
        .env_remove("SDM_DATA_DIR")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn stored_tasks(data_dir: &Path) -> Vec<Task> {
    let raw = fs::read_to_string(data_dir.join("soft-deadline-manager.v1.json")).expect("store file");
    serde_json::from_str(&raw).expect("valid payload")
}

#[test]
fn help_works() {
    Command::cargo_bin("sdm")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Soft deadline manager"));
}

#[test]
fn first_run_seeds_demo_tasks() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(contains("Write project spec").and(contains("Prepare slides")));
    assert_eq!(stored_tasks(dir.path()).len(), 4);
}

#[test]
fn add_then_list_shows_task() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path())
        .args(["add", "Renew passport", "--due", "in 10d", "--category", "Admin", "--priority", "high"])
        .assert()
        .success()
        .stdout(contains("Added task task-"));

    sdm(dir.path())
        .args(["list", "--filter", "active"])
        .assert()
        .success()
        .stdout(contains("Renew passport").and(contains("on-track")));

    let tasks = stored_tasks(dir.path());
    let added = tasks.iter().find(|t| t.title == "Renew passport").expect("added task");
    assert_eq!(added.original_deadline, added.current_deadline);
    assert_eq!(added.category.as_deref(), Some("Admin"));
}

#[test]
fn add_rejects_blank_title() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path())
        .args(["add", "  ", "--due", "tomorrow"])
        .assert()
        .code(2)
        .stderr(contains("title cannot be empty"));
}

#[test]
fn add_rejects_unparseable_due_date() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path())
        .args(["add", "Renew passport", "--due", "whenever"])
        .assert()
        .code(2)
        .stderr(contains("unrecognised date"));
}

#[test]
fn add_rejects_out_of_range_relative_due() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path())
        .args(["add", "Renew passport", "--due", "in 99999999999d"])
        .assert()
        .code(2)
        .stderr(contains("unrecognised date"));
    sdm(dir.path())
        .args(["extend", "task-1", "--to", "in 999999999w"])
        .assert()
        .code(2)
        .stderr(contains("unrecognised date"));
    assert!(stored_tasks(dir.path()).iter().all(|t| t.title != "Renew passport"));
}

#[test]
fn extend_records_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path())
        .args(["add", "Write spec", "--due", "2030-01-10"])
        .assert()
        .success();

    sdm(dir.path())
        .args(["extend", "Write spec", "--days", "3", "--reason", "Low energy"])
        .assert()
        .success()
        .stdout(contains("1 extension(s)"));

    sdm(dir.path())
        .args(["view", "write spec"])
        .assert()
        .success()
        .stdout(contains("Extensions:   1").and(contains("Low energy")));

    let tasks = stored_tasks(dir.path());
    let task = tasks.iter().find(|t| t.title == "Write spec").expect("task");
    assert_eq!(task.deadline_history.len(), 1);
    assert_eq!(task.deadline_history[0].previous_deadline, task.original_deadline);
    assert_eq!(task.current_deadline - task.original_deadline, chrono::Duration::days(3));
}

#[test]
fn extend_days_outside_range_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path())
        .args(["extend", "task-1", "--days", "45"])
        .assert()
        .code(2);
}

#[test]
fn complete_then_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path()).args(["complete", "task-2"]).assert().success();
    let done = stored_tasks(dir.path());
    assert!(done.iter().any(|t| t.id.as_str() == "task-2" && t.completed_at.is_some()));

    sdm(dir.path())
        .args(["reopen", "task-2"])
        .assert()
        .success()
        .stdout(contains("Reopened task-2"));
    let reopened = stored_tasks(dir.path());
    let t = reopened.iter().find(|t| t.id.as_str() == "task-2").expect("task-2");
    assert!(t.completed_at.is_none());
    assert_eq!(t.extension_count, 1);
}

#[test]
fn delete_unknown_task_exits_with_user_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path()).arg("list").assert().success();
    let before = stored_tasks(dir.path());

    sdm(dir.path())
        .args(["delete", "task-404"])
        .assert()
        .code(2)
        .stderr(contains("Task not found"));
    assert_eq!(stored_tasks(dir.path()), before);
}

#[test]
fn delete_removes_task() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path())
        .args(["delete", "task-4"])
        .assert()
        .success()
        .stdout(contains("Gym workout session"));
    assert!(stored_tasks(dir.path()).iter().all(|t| t.id.as_str() != "task-4"));
}

#[test]
fn corrupt_store_falls_back_to_seed() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("soft-deadline-manager.v1.json"), "{oops").expect("write");
    sdm(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(contains("Completed  1"));
    assert_eq!(stored_tasks(dir.path()).len(), 4);
    let backup = fs::read_to_string(dir.path().join("soft-deadline-manager.v1.corrupt.json"))
        .expect("backup file");
    assert_eq!(backup, "{oops");
}

#[test]
fn insights_report_reasons() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path())
        .arg("insights")
        .assert()
        .success()
        .stdout(contains("Underestimated effort").and(contains("Average extensions per task: 0.25")));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("config.toml"), "default_extend_days = 0\n").expect("write");
    sdm(dir.path())
        .arg("list")
        .assert()
        .code(2)
        .stderr(contains("Invalid configuration"));
}

#[test]
fn completions_generate() {
    Command::cargo_bin("sdm")
        .expect("binary")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(contains("sdm"));
}

#[test]
fn completions_leave_data_dir_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    sdm(dir.path()).args(["completions", "zsh"]).assert().success();
    assert!(!dir.path().join("soft-deadline-manager.v1.json").exists());
}
