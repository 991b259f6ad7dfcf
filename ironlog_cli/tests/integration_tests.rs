//! Integration tests for the ironlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - The start / set / finish workout flow
//! - Personal record reporting
//! - Empty workout rejection
//! - Catalog browsing and editing
//! - History, export and profile commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to run the CLI against an isolated data and config directory
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ironlog"));
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn run(dir: &Path, args: &[&str]) {
    cli(dir).args(args).assert().success();
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout logger with personal record tracking",
        ));
}

#[test]
fn test_start_creates_active_session() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir)
        .args(["start", "--template", "push_day"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started 'Push Day'"))
        .stdout(predicate::str::contains("Bench Press"));

    let active = fs::read_to_string(dir.join("data/active_session.json")).unwrap();
    let session: serde_json::Value = serde_json::from_str(&active).unwrap();
    assert_eq!(session["template_id"], "push_day");
    assert_eq!(session["exercises"].as_array().unwrap().len(), 3);
}

#[test]
fn test_cannot_start_twice() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    run(dir, &["start"]);
    cli(dir)
        .arg("start")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already in progress"));
}

#[test]
fn test_finish_reports_new_record_once() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    run(dir, &["start", "--template", "push_day"]);
    run(
        dir,
        &["set", "barbell_bench_press", "--weight", "100", "--reps", "5"],
    );
    cli(dir)
        .arg("finish")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout saved: Push Day"))
        .stdout(predicate::str::contains("New PR: Bench Press 100 kg x 5"));

    assert!(!dir.join("data/active_session.json").exists());

    // Matching the record is not a new record
    run(dir, &["start", "--name", "Bench again"]);
    run(
        dir,
        &["set", "barbell_bench_press", "--weight", "100", "--reps", "6"],
    );
    cli(dir)
        .arg("finish")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout saved: Bench again"))
        .stdout(predicate::str::contains("New PR").not());

    cli(dir)
        .args(["record", "barbell_bench_press"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Best barbell_bench_press: 100 kg"));
}

#[test]
fn test_finish_empty_workout_fails_without_saving() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    run(dir, &["start"]);
    cli(dir)
        .arg("finish")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot finalize an empty workout"));

    // Nothing persisted, active session kept for the user to fix
    assert!(!dir.join("data/workouts.jsonl").exists());
    assert!(dir.join("data/active_session.json").exists());

    run(dir, &["discard"]);
    assert!(!dir.join("data/active_session.json").exists());
}

#[test]
fn test_finish_without_active_workout() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("finish")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no workout in progress"));
}

#[test]
fn test_planned_sets_are_not_records() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    run(dir, &["start"]);
    run(
        dir,
        &["set", "barbell_deadlift", "--weight", "200", "--reps", "1", "--pending"],
    );
    cli(dir)
        .arg("finish")
        .assert()
        .success()
        .stdout(predicate::str::contains("New PR").not());

    cli(dir)
        .args(["record", "barbell_deadlift"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No completed sets"));
}

#[test]
fn test_set_for_unknown_exercise_fails() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    run(dir, &["start"]);
    cli(dir)
        .args(["set", "moon_press", "--weight", "10", "--reps", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("moon_press"));
}

#[test]
fn test_exercises_query_and_sort() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    let output = cli(dir)
        .args(["exercises", "--query", "PRESS"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let names: Vec<&str> = stdout.lines().map(|l| l.trim()).collect();
    assert_eq!(names.len(), 3);
    assert!(names[0].starts_with("Bench Press"));
    assert!(names[1].starts_with("Leg Press"));
    assert!(names[2].starts_with("Overhead Press"));

    let output = cli(dir)
        .args(["exercises", "--query", "press", "--desc"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.lines().next().unwrap().trim().starts_with("Overhead Press"));
}

#[test]
fn test_exercises_body_part_and_category() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir)
        .args(["exercises", "--body-part", "calves", "--body-part", "triceps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Calf Raise"))
        .stdout(predicate::str::contains("Triceps Pushdown"))
        .stdout(predicate::str::contains("Deadlift").not());

    cli(dir)
        .args(["exercises", "--category", "bodyweight", "--query", "zzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No exercises match"));
}

#[test]
fn test_custom_exercise_lifecycle() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir)
        .args(["exercise", "add", "--id", "blank", "--name", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must have a name"));

    run(
        dir,
        &[
            "exercise",
            "add",
            "--id",
            "sandbag_carry",
            "--name",
            "Sandbag Carry",
            "--category",
            "other",
            "--body-part",
            "full_body",
        ],
    );
    cli(dir)
        .args(["exercises", "--query", "sandbag"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sandbag Carry"));

    run(dir, &["exercise", "delete", "sandbag_carry"]);
    cli(dir)
        .args(["exercise", "delete", "sandbag_carry"])
        .assert()
        .failure();
}

#[test]
fn test_history_and_export() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    run(dir, &["start", "--template", "leg_day"]);
    run(
        dir,
        &["set", "barbell_back_squat", "--weight", "120", "--reps", "5"],
    );
    run(
        dir,
        &["set", "barbell_back_squat", "--weight", "120", "--reps", "5"],
    );
    run(dir, &["finish"]);

    cli(dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Leg Day"))
        .stdout(predicate::str::contains("2 sets"))
        .stdout(predicate::str::contains("2 PR"));

    cli(dir)
        .args(["history", "--to", "2000-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts found"));

    let csv_path = dir.join("export.csv");
    cli(dir)
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 9 sets"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("session_id,"));
    assert_eq!(csv.lines().count(), 10);
}

#[test]
fn test_profile_unit_applies_to_sets() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir)
        .args(["profile", "--name", "Sam", "--unit", "lb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unit:        lb"));

    run(dir, &["start"]);
    cli(dir)
        .args(["set", "barbell_bench_press", "--weight", "225", "--reps", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("225 lb x 3"));

    let active = fs::read_to_string(dir.join("data/active_session.json")).unwrap();
    let session: serde_json::Value = serde_json::from_str(&active).unwrap();
    let kg = session["exercises"][0]["sets"][0]["weight_kg"].as_f64().unwrap();
    assert!((kg - 102.058).abs() < 0.001);
}

#[test]
fn test_rest_countdown_completes() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .args(["rest", "--seconds", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rest complete"));
}

#[test]
fn test_templates_listed() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day (push_day)"))
        .stdout(predicate::str::contains("3 x Back Squat"));
}
