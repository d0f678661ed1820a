//! CLI end-to-end tests
//!
//! Tests for the crossfader command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the crossfader binary
#[allow(deprecated)]
fn crossfader_cmd() -> Command {
    let mut cmd = Command::cargo_bin("crossfader").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture_project() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project.toml")
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = crossfader_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = crossfader_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("crossfader"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = crossfader_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_build_summary() {
    let mut cmd = crossfader_cmd();
    cmd.arg("build")
        .arg(fixture_project())
        .assert()
        .success()
        .stdout(predicate::str::contains("Duration: 8s"))
        .stdout(predicate::str::contains("Transition: 2s"))
        .stdout(predicate::str::contains("Placements: 2"))
        .stdout(predicate::str::contains("Video instructions: 3"))
        .stdout(predicate::str::contains("transition layers"));
}

#[test]
fn test_cli_build_json() {
    let output = crossfader_cmd()
        .args(["build", "--json"])
        .arg(fixture_project())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["plan"]["entries"].as_array().unwrap().len(), 2);
    assert_eq!(
        json["video_composition"]["instructions"]
            .as_array()
            .unwrap()
            .len(),
        3
    );
    assert_eq!(json["audio_mix"]["ramps"].as_array().unwrap().len(), 3);
}

#[test]
fn test_cli_build_uses_global_config_flag() {
    let mut cmd = crossfader_cmd();
    cmd.arg("--config")
        .arg(fixture_project())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Duration: 8s"));
}

#[test]
fn test_cli_debug_layout() {
    let mut cmd = crossfader_cmd();
    cmd.arg("debug")
        .arg(fixture_project())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tracks:"))
        .stdout(predicate::str::contains("video track 1"))
        .stdout(predicate::str::contains("Audio mix:"))
        .stdout(predicate::str::contains("Video stages:"))
        .stdout(predicate::str::contains("\"Harbor\""));
}

#[test]
fn test_cli_simulate_plays_to_end() {
    let mut cmd = crossfader_cmd();
    cmd.args(["simulate", "--step", "1"])
        .arg(fixture_project())
        .assert()
        .success()
        .stdout(predicate::str::contains("00:04 0.500"))
        .stdout(predicate::str::contains("00:08 1.000"))
        .stdout(predicate::str::contains("Reached end at 00:08"));
}

#[test]
fn test_cli_simulate_rejects_bad_step() {
    let mut cmd = crossfader_cmd();
    cmd.args(["simulate", "--step", "0"])
        .arg(fixture_project())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Step must be a positive"));
}

#[test]
fn test_cli_missing_project_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = crossfader_cmd();
    cmd.arg("build")
        .arg(dir.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read project file"));
}

#[test]
fn test_cli_init_then_validate() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("sample.toml");

    crossfader_cmd()
        .arg("init")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote sample project"));
    assert!(project.exists());

    crossfader_cmd()
        .arg("validate")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Project is valid"))
        .stdout(predicate::str::contains("Clips: 2"));

    // A second init refuses to overwrite
    crossfader_cmd()
        .arg("init")
        .arg(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_cli_transition_edits_in_place() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("project.toml");
    fs::copy(fixture_project(), &project).unwrap();

    crossfader_cmd()
        .args(["transition", "--secs", "1", "--disable"])
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("Transition disabled (1s)"));

    let content = fs::read_to_string(&project).unwrap();
    assert!(content.starts_with("# Two five second clips"));
    assert!(content.contains("enabled = false"));

    // Disabled transitions lay the clips end to end
    crossfader_cmd()
        .arg("build")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("Duration: 10s"));
}

#[test]
fn test_cli_transition_rejects_negative() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("project.toml");
    fs::copy(fixture_project(), &project).unwrap();

    crossfader_cmd()
        .args(["transition", "--secs=-1"])
        .arg(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));
}
