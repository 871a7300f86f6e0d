//! Process and revert across the whole stack
//!
//! Exercises pak collections on disk, the reanchor transform and the
//! backup store together.

use hudfix_archive::{Collection, PakCollection, PakOpener};
use hudfix_core::{BackupStore, WorkflowCoordinator};
use hudfix_layout::{CentralReanchor, LAYOUT_SUFFIX};
use hudfix_test_utils::{ARCHIVE_A, ARCHIVE_B, CHAT, MINIMAP, PATTERN, TEXTURE, TestCollection};
use pretty_assertions::assert_eq;

fn coordinator(game: &TestCollection) -> WorkflowCoordinator<PakOpener, CentralReanchor> {
    WorkflowCoordinator::new(
        PakOpener::default(),
        CentralReanchor::new(),
        BackupStore::new(game.backup_dir()),
    )
}

#[test]
fn round_trip_restores_nested_collection() {
    let game = TestCollection::scenario()
        .with_archive(
            "Mods/Overlay/1.2/Overlay.pak",
            &[("DATA/Menu/HUD/Elements/Overlay.ini", b"[Overlay]\nAnchorX=0.25\n")],
        )
        .with_archive("Loose.pak", &[("DATA/Menu/HUD/Elements/readme.txt", b"hi")]);
    let before = game.files();
    let coordinator = coordinator(&game);

    let result = coordinator.process(game.root(), PATTERN, "1920").unwrap();
    assert_eq!(result.entries_transformed, 3);
    assert_eq!(result.archives_saved, 3);
    assert_eq!(result.archives_backed_up, 4);

    coordinator.revert(game.root()).unwrap();
    assert_eq!(game.files(), before);
}

#[test]
fn second_process_backs_up_transformed_state() {
    let game = TestCollection::scenario();
    let coordinator = coordinator(&game);

    coordinator.process(game.root(), PATTERN, "1920").unwrap();
    let after_first = game.files();
    coordinator.process(game.root(), PATTERN, "1920").unwrap();

    // A re-anchored element is already centered; the second pass is a no-op
    // on layout payloads, and revert returns to the first pass's output.
    assert_eq!(
        game.read_entry(ARCHIVE_A, MINIMAP),
        b"[Minimap]\r\nAnchorX=0.5\r\nXOffset=760\r\n"
    );
    coordinator.revert(game.root()).unwrap();
    assert_eq!(game.files(), after_first);
}

#[test]
fn untouched_entries_survive_save() {
    let game = TestCollection::scenario();

    coordinator(&game).process(game.root(), PATTERN, "1600").unwrap();

    let collection = PakCollection::open(game.root()).unwrap();
    let entries = collection.search("").unwrap();
    let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths.len(), 4);
    assert!(paths.contains(&TEXTURE));
    assert_eq!(game.read_entry(ARCHIVE_A, TEXTURE), b"DDS |\x00\x01\x02");
    assert!(
        entries
            .iter()
            .filter(|e| e.path.ends_with(LAYOUT_SUFFIX))
            .all(|e| String::from_utf8(collection.extract(e).unwrap())
                .unwrap()
                .contains("AnchorX=0.5"))
    );
}

#[test]
fn sidecars_describe_saved_payloads() {
    let game = TestCollection::scenario();

    coordinator(&game).process(game.root(), PATTERN, "1920").unwrap();

    let sidecar = hudfix_archive::SidecarManifest::load(&hudfix_fs::NormalizedPath::new(
        game.root().join(hudfix_fs::HudPath::sidecar_for(ARCHIVE_B)),
    ))
    .unwrap();
    let chat = game.read_entry(ARCHIVE_B, CHAT);
    let entry = sidecar.entry(CHAT).unwrap();
    assert_eq!(entry.size, chat.len() as u64);
    assert_eq!(entry.checksum, hudfix_fs::checksum::compute_checksum(&chat));
}
