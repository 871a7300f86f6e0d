//! Failure and recovery paths: locks, interrupted snapshots, bad layouts

use std::fs;
use std::time::Duration;

use hudfix_archive::PakOpener;
use hudfix_core::{BackupStore, Error, Stage, WorkflowCoordinator};
use hudfix_fs::{HudPath, RobustnessConfig};
use hudfix_layout::CentralReanchor;
use hudfix_test_utils::{ARCHIVE_A, ARCHIVE_B, MINIMAP, PATTERN, TestCollection};
use pretty_assertions::assert_eq;

fn fast_lock() -> RobustnessConfig {
    RobustnessConfig {
        lock_timeout: Duration::from_millis(200),
        enable_fsync: false,
    }
}

fn coordinator(game: &TestCollection) -> WorkflowCoordinator<PakOpener, CentralReanchor> {
    WorkflowCoordinator::new(
        PakOpener::new(fast_lock()),
        CentralReanchor::new(),
        BackupStore::with_robustness(game.backup_dir(), fast_lock()),
    )
}

#[test]
fn concurrent_run_is_refused_while_locked() {
    let game = TestCollection::scenario();
    let before = game.files();
    let coordinator = coordinator(&game);
    let held = coordinator.store().lock().unwrap();

    let err = coordinator.process(game.root(), PATTERN, "1920").unwrap_err();

    assert!(matches!(err, Error::Locked { .. }), "got {err:?}");
    assert_eq!(game.files(), before);
    drop(held);

    coordinator.process(game.root(), PATTERN, "1920").unwrap();
}

#[test]
fn revert_from_interrupted_snapshot_restores_what_was_copied() {
    let game = TestCollection::scenario();
    let before = game.files();
    let store = BackupStore::new(game.backup_dir());

    // Only archive A made it into the backup before the interruption
    store.create().unwrap();
    store
        .snapshot(
            ARCHIVE_A,
            &before[ARCHIVE_A],
            &before[&HudPath::sidecar_for(ARCHIVE_A)],
        )
        .unwrap();
    game.add_archive(ARCHIVE_A, &[(MINIMAP, b"[Minimap]\nAnchorX=0.5\n")]);

    assert!(matches!(store.verify(), Err(Error::IncompleteSnapshot { .. })));
    let report = coordinator(&game).revert(game.root()).unwrap();

    assert_eq!(report.files, 2);
    assert_eq!(game.files(), before);
}

#[test]
fn transform_failure_leaves_backup_for_revert() {
    let game = TestCollection::scenario().with_archive(
        "0.0.0.3/Archive_3.pak",
        &[("DATA/Menu/HUD/Elements/Zz.ini", b"[Zz]\nAnchorX=nan\n")],
    );
    let before = game.files();
    let coordinator = coordinator(&game);

    let err = coordinator.process(game.root(), PATTERN, "1920").unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Transform));
    // Staged payloads were never saved
    assert_eq!(game.files(), before);
    for relpath in [ARCHIVE_A, ARCHIVE_B, "0.0.0.3/Archive_3.pak"] {
        assert!(game.backup_dir().join(relpath).is_file(), "{relpath} not backed up");
    }
    assert!(coordinator.store().verify().unwrap().is_clean());
}

fn assert_overlap_refused(game: &TestCollection, backup: &std::path::Path) {
    let before = game.files();
    let coordinator = WorkflowCoordinator::new(
        PakOpener::new(fast_lock()),
        CentralReanchor::new(),
        BackupStore::with_robustness(backup, fast_lock()),
    );

    let err = coordinator.process(game.root(), PATTERN, "1920").unwrap_err();

    assert!(matches!(err, Error::BackupOverlapsCollection { .. }), "got {err:?}");
    assert_eq!(err.stage(), Some(Stage::Validate));
    assert_eq!(game.files(), before);
    assert!(!coordinator.store().lock_path().exists());

    let err = coordinator.revert(game.root()).unwrap_err();
    assert!(matches!(err, Error::BackupOverlapsCollection { .. }), "got {err:?}");
    assert_eq!(game.files(), before);
}

#[test]
fn backup_inside_collection_is_refused() {
    let game = TestCollection::scenario();
    assert_overlap_refused(&game, &game.root().join("backup"));
}

#[test]
fn backup_equal_to_collection_keeps_every_file() {
    let game = TestCollection::scenario();
    assert_overlap_refused(&game, game.root());
}

#[test]
fn backup_above_collection_keeps_every_file() {
    let game = TestCollection::scenario();
    assert_overlap_refused(&game, game.base());
}

#[test]
fn backup_reached_through_parent_component_is_refused() {
    let game = TestCollection::scenario();
    assert_overlap_refused(&game, &game.root().join("0.0.0.1").join(".."));
}

#[test]
fn missing_sidecar_fails_at_locate() {
    let game = TestCollection::scenario();
    fs::remove_file(game.root().join(HudPath::sidecar_for(ARCHIVE_B))).unwrap();

    let err = coordinator(&game).process(game.root(), PATTERN, "1920").unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }), "got {err:?}");
    assert_eq!(err.stage(), Some(Stage::Locate));
}
