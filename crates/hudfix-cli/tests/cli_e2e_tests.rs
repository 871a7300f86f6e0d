//! CLI end-to-end tests that invoke the compiled `hudfix` binary.
//!
//! Every test points `--backup-dir` at its own temporary directory and
//! runs with a scrubbed working directory so no real settings are read.

use assert_cmd::Command;
use hudfix_test_utils::{ARCHIVE_A, MINIMAP, TestCollection};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;

/// Get a Command for the hudfix binary rooted in `game`'s temp directory.
fn hudfix(game: &TestCollection) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hudfix"));
    cmd.current_dir(game.base())
        .env_remove("HUDFIX_BACKUP_DIR")
        .arg("--backup-dir")
        .arg(game.backup_dir());
    cmd
}

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let game = TestCollection::new();
    hudfix(&game)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("revert"));
}

#[test]
fn test_version_output() {
    let game = TestCollection::new();
    hudfix(&game)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hudfix"));
}

// ============================================================================
// Process / Revert
// ============================================================================

#[test]
fn test_process_prints_stages_and_summary() {
    let game = TestCollection::scenario();

    hudfix(&game)
        .args(["process", "--yes", "--root"])
        .arg(game.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating backups..."))
        .stdout(predicate::str::contains("Transformed 2 entries in 2 archives"))
        .stdout(predicate::str::contains("backup present"));

    assert!(game.backup_dir().join(ARCHIVE_A).is_file());
    let minimap = String::from_utf8(game.read_entry(ARCHIVE_A, MINIMAP)).unwrap();
    assert!(minimap.contains("AnchorX=0.5"), "got {minimap}");
}

#[test]
fn test_process_then_revert_round_trip() {
    let game = TestCollection::scenario();
    let before = game.files();

    hudfix(&game)
        .args(["process", "--yes", "--resolution", "3440", "--root"])
        .arg(game.root())
        .assert()
        .success();
    hudfix(&game)
        .args(["revert", "--discard", "--root"])
        .arg(game.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 4 files"));

    assert_eq!(game.files(), before);
    assert!(!game.backup_dir().exists());
}

#[test]
fn test_invalid_resolution_fails_without_changes() {
    let game = TestCollection::scenario();
    let before = game.files();

    hudfix(&game)
        .args(["process", "--yes", "--resolution", "-5", "--root"])
        .arg(game.root())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("Invalid target resolution"));

    assert_eq!(game.files(), before);
    assert!(!game.backup_dir().exists());
}

#[test]
fn test_process_without_yes_refuses_when_not_a_terminal() {
    let game = TestCollection::scenario();
    let before = game.files();

    hudfix(&game)
        .args(["process", "--root"])
        .arg(game.root())
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    assert_eq!(game.files(), before);
}

#[test]
fn test_revert_without_backup_fails() {
    let game = TestCollection::scenario();

    hudfix(&game)
        .args(["revert", "--root"])
        .arg(game.root())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Status:"))
        .stdout(predicate::str::contains("error"))
        .stderr(predicate::str::contains("No backup found"));
}

#[test]
fn test_backup_dir_equal_to_root_is_refused() {
    let game = TestCollection::scenario();
    let before = game.files();

    Command::new(env!("CARGO_BIN_EXE_hudfix"))
        .current_dir(game.base())
        .env("HUDFIX_BACKUP_DIR", game.root())
        .args(["process", "--yes", "--root"])
        .arg(game.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlaps the collection root"));

    assert_eq!(game.files(), before);
}

#[test]
fn test_missing_root_fails() {
    let game = TestCollection::new();

    hudfix(&game)
        .args(["process", "--yes", "--root"])
        .arg(game.base().join("not-there"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// Status / Verify / Discard
// ============================================================================

#[test]
fn test_status_json_tracks_backup() {
    let game = TestCollection::scenario();

    hudfix(&game)
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"idle\""));

    hudfix(&game)
        .args(["process", "--yes", "--root"])
        .arg(game.root())
        .assert()
        .success();

    let output = hudfix(&game).args(["status", "--json"]).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "backup_present");
    assert_eq!(json["complete"], true);
    assert_eq!(json["snapshot"]["target_resolution"], 1920);
}

#[test]
fn test_verify_detects_tampered_backup() {
    let game = TestCollection::scenario();
    hudfix(&game)
        .args(["process", "--yes", "--root"])
        .arg(game.root())
        .assert()
        .success();

    hudfix(&game)
        .arg("verify")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 files match"));

    fs::write(game.backup_dir().join(ARCHIVE_A), b"tampered").unwrap();

    hudfix(&game)
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 changed"));
}

#[test]
fn test_discard_with_yes_removes_backup() {
    let game = TestCollection::scenario();
    hudfix(&game)
        .args(["process", "--yes", "--root"])
        .arg(game.root())
        .assert()
        .success();

    hudfix(&game)
        .args(["discard", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup discarded"));

    assert!(!game.backup_dir().exists());
}

#[test]
fn test_settings_file_sets_resolution() {
    let game = TestCollection::scenario();
    let config = game.base().join("custom.toml");
    fs::write(&config, "resolution = 1280\n").unwrap();

    hudfix(&game)
        .arg("--config")
        .arg(&config)
        .args(["process", "--yes", "--root"])
        .arg(game.root())
        .assert()
        .success();

    let minimap = String::from_utf8(game.read_entry(ARCHIVE_A, MINIMAP)).unwrap();
    // -200 + round(0.5 * 1280)
    assert!(minimap.contains("XOffset=440"), "got {minimap}");
}

#[test]
fn test_completions_bash() {
    let game = TestCollection::new();
    hudfix(&game)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hudfix"));
}
