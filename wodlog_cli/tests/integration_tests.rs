//! Integration tests for the wodlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Preview output (human and JSON)
//! - Confirm writing the library
//! - Re-import reusing catalog entries
//! - Configuration handling

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "Customer Name,Location Name,Date,Program Name,Class Name,Component Type,Component ID,Component Name,Component Description,Performance Result Type,Rep Scheme,Fully Formatted Result,From Weightlifting Total,From Variable Set,Is Rx,Is Rx Plus,Is Personal Record,Personal Record Description,Comment";

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("wodlog"))
}

/// CLI pointed at an isolated config and data directory
fn cli_in(temp_dir: &TempDir) -> Command {
    let config_path = temp_dir.path().join("config.toml");
    if !config_path.exists() {
        fs::write(&config_path, "[import]\nuser_id = 1\n").expect("Failed to write config");
    }

    let mut cmd = cli();
    cmd.arg("--config")
        .arg(&config_path)
        .arg("--data-dir")
        .arg(data_dir(temp_dir));
    cmd
}

fn data_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("data")
}

fn row(date: &str, component_type: &str, name: &str, result_type: &str, result: &str, pr: bool) -> String {
    format!(
        "Jane Doe,Main Gym,{},CrossFit,5:30 PM,{},1001,{},,{},,{},FALSE,FALSE,TRUE,FALSE,{},,",
        date,
        component_type,
        name,
        result_type,
        result,
        if pr { "TRUE" } else { "FALSE" }
    )
}

fn write_export(dir: &Path, rows: &[String]) -> PathBuf {
    let path = dir.join("export.csv");
    let mut contents = String::from(HEADER);
    for r in rows {
        contents.push('\n');
        contents.push_str(r);
    }
    contents.push('\n');
    fs::write(&path, contents).expect("Failed to write export");
    path
}

fn scenario_export(dir: &Path) -> PathBuf {
    write_export(
        dir,
        &[
            row("01/05/2024", "Weightlifting", "Back Squat", "Weight", "1 x 5 @ 135 lbs", false),
            row("01/05/2024", "Metcon", "Fran", "Time", "5:30", true),
            row("01/06/2024", "Weightlifting", "Zercher Squat", "Weight", "3 x 5 @ 185 lbs", false),
        ],
    )
}

fn read_library(temp_dir: &TempDir) -> Value {
    let contents = fs::read_to_string(data_dir(temp_dir).join("library.json"))
        .expect("Failed to read library");
    serde_json::from_str(&contents).expect("Library is not valid JSON")
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Import Wodify workout performance exports",
        ));
}

#[test]
fn test_preview_human_output() {
    let temp_dir = setup_test_dir();
    let export = scenario_export(temp_dir.path());

    cli_in(&temp_dir)
        .arg("preview")
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows: 3 total, 3 valid, 0 invalid"))
        .stdout(predicate::str::contains("Workout dates: 2"))
        .stdout(predicate::str::contains("+ Zercher Squat"));
}

#[test]
fn test_preview_json_against_standard_catalog() {
    let temp_dir = setup_test_dir();
    let export = scenario_export(temp_dir.path());

    let output = cli_in(&temp_dir)
        .arg("preview")
        .arg(&export)
        .arg("--json")
        .output()
        .expect("Failed to run preview");
    assert!(output.status.success());

    let preview: Value = serde_json::from_slice(&output.stdout).expect("Preview is not JSON");
    assert_eq!(preview["total_rows"], 3);
    assert_eq!(preview["unique_workout_dates"], 2);
    assert_eq!(preview["sessions_to_create"], 2);
    assert_eq!(preview["performances_to_create"], 3);
    // Back Squat and Fran are in the standard catalog
    assert_eq!(preview["new_movements"], serde_json::json!(["Zercher Squat"]));
    assert_eq!(preview["new_wods"], serde_json::json!([]));
    assert_eq!(preview["workout_summary"][0]["has_prs"], true);
}

#[test]
fn test_preview_does_not_write_library() {
    let temp_dir = setup_test_dir();
    let export = scenario_export(temp_dir.path());

    cli_in(&temp_dir)
        .arg("preview")
        .arg(&export)
        .assert()
        .success();

    assert!(!data_dir(&temp_dir).join("library.json").exists());
}

#[test]
fn test_preview_reports_short_rows() {
    let temp_dir = setup_test_dir();
    let export = write_export(
        temp_dir.path(),
        &[
            row("01/05/2024", "Weightlifting", "Deadlift", "Weight", "1 x 1 @ 315 lbs", false),
            "Jane Doe,Main Gym,01/05/2024".to_string(),
            row("01/06/2024", "Metcon", "Helen", "Time", "9:45", false),
        ],
    );

    let output = cli_in(&temp_dir)
        .arg("preview")
        .arg(&export)
        .arg("--json")
        .output()
        .expect("Failed to run preview");
    assert!(output.status.success());

    let preview: Value = serde_json::from_slice(&output.stdout).expect("Preview is not JSON");
    assert_eq!(preview["invalid_rows"], 1);
    assert_eq!(preview["valid_rows"], 2);
    assert_eq!(preview["errors"].as_array().map(|e| e.len()), Some(1));
}

#[test]
fn test_confirm_creates_library() {
    let temp_dir = setup_test_dir();
    let export = scenario_export(temp_dir.path());

    cli_in(&temp_dir)
        .arg("confirm")
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Import complete"))
        .stdout(predicate::str::contains("Sessions: 2"))
        .stdout(predicate::str::contains("PRs: 1"));

    let library = read_library(&temp_dir);
    let sessions = library["sessions"].as_array().expect("sessions array");
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["workout_name"], "Workout 2024-01-05");
    assert_eq!(library["movement_performances"].as_array().map(|p| p.len()), Some(2));

    let fran = &library["wod_performances"][0];
    assert_eq!(fran["time_seconds"], 330);
    assert_eq!(fran["score_value"], "05:30");
}

#[test]
fn test_confirm_json_and_user_id() {
    let temp_dir = setup_test_dir();
    let export = scenario_export(temp_dir.path());

    let output = cli_in(&temp_dir)
        .arg("--user-id")
        .arg("42")
        .arg("confirm")
        .arg(&export)
        .arg("--json")
        .output()
        .expect("Failed to run confirm");
    assert!(output.status.success());

    let result: Value = serde_json::from_slice(&output.stdout).expect("Result is not JSON");
    assert_eq!(result["sessions_created"], 2);
    assert_eq!(result["movements_created"], 1);
    assert!(result["import_id"].is_string());

    let library = read_library(&temp_dir);
    for session in library["sessions"].as_array().expect("sessions array") {
        assert_eq!(session["user_id"], 42);
        assert_eq!(session["import_id"], result["import_id"]);
    }
}

#[test]
fn test_reimport_does_not_duplicate_catalog_entries() {
    let temp_dir = setup_test_dir();
    let export = scenario_export(temp_dir.path());

    for _ in 0..2 {
        cli_in(&temp_dir)
            .arg("confirm")
            .arg(&export)
            .assert()
            .success();
    }

    let library = read_library(&temp_dir);
    let zercher = library["movements"]
        .as_array()
        .expect("movements array")
        .iter()
        .filter(|m| m["name"] == "Zercher Squat")
        .count();
    assert_eq!(zercher, 1);
    assert_eq!(library["sessions"].as_array().map(|s| s.len()), Some(4));
}

#[test]
fn test_confirm_missing_export_fails() {
    let temp_dir = setup_test_dir();

    cli_in(&temp_dir)
        .arg("confirm")
        .arg(temp_dir.path().join("nope.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open export"));

    assert!(!data_dir(&temp_dir).join("library.json").exists());
}

#[test]
fn test_corrupt_library_is_not_overwritten() {
    let temp_dir = setup_test_dir();
    let export = scenario_export(temp_dir.path());
    fs::create_dir_all(data_dir(&temp_dir)).unwrap();
    fs::write(data_dir(&temp_dir).join("library.json"), "{ not json").unwrap();

    cli_in(&temp_dir)
        .arg("confirm")
        .arg(&export)
        .assert()
        .failure();

    let contents = fs::read_to_string(data_dir(&temp_dir).join("library.json")).unwrap();
    assert_eq!(contents, "{ not json");
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = setup_test_dir();
    let export = scenario_export(temp_dir.path());
    fs::write(
        temp_dir.path().join("config.toml"),
        "[import]\nsearch_limit = 0\n",
    )
    .unwrap();

    cli_in(&temp_dir)
        .arg("preview")
        .arg(&export)
        .assert()
        .failure()
        .stderr(predicate::str::contains("search_limit"));
}
