//! The process run: back up, transform, persist

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use hudfix_archive::{ArchiveId, Collection, CollectionOpener, EntryHandle};
use hudfix_layout::{LAYOUT_SUFFIX, Transform};
use serde::Serialize;
use tracing::{debug, info};

use crate::revert::{self, RevertReport};
use crate::{ArchiveCollector, BackupStore, Error, Result, SnapshotManifest, Stage, TargetResolution};

/// Counts reported by a successful process run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowResult {
    /// Entries rewritten by the transform
    pub entries_transformed: usize,
    /// Archives written back to disk, each exactly once
    pub archives_saved: usize,
    /// Archives copied into the backup root
    pub archives_backed_up: usize,
}

impl fmt::Display for WorkflowResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transformed {} {} in {} {} ({} backed up)",
            self.entries_transformed,
            plural(self.entries_transformed, "entry", "entries"),
            self.archives_saved,
            plural(self.archives_saved, "archive", "archives"),
            self.archives_backed_up,
        )
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

/// Sequences process, revert and discard against one backup root.
///
/// The coordinator holds no per-run state; every call opens the collection
/// afresh and takes the backup lock for its duration.
pub struct WorkflowCoordinator<O, T> {
    opener: O,
    transform: T,
    store: BackupStore,
    suffix: String,
}

impl<O, T> WorkflowCoordinator<O, T>
where
    O: CollectionOpener,
    T: Transform,
{
    pub fn new(opener: O, transform: T, store: BackupStore) -> Self {
        Self {
            opener,
            transform,
            store,
            suffix: LAYOUT_SUFFIX.to_string(),
        }
    }

    /// Transform entries ending with `suffix` instead of the layout suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn store(&self) -> &BackupStore {
        &self.store
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn process(&self, root: &Path, pattern: &str, target_resolution: &str) -> Result<WorkflowResult> {
        self.process_with(root, pattern, target_resolution, &mut |_| {})
    }

    /// Run every stage in order, telling `observer` before each one starts.
    ///
    /// A failure aborts the remaining stages. Nothing already written is
    /// rolled back; the backup root keeps whatever was snapshotted.
    pub fn process_with(
        &self,
        root: &Path,
        pattern: &str,
        target_resolution: &str,
        observer: &mut dyn FnMut(Stage),
    ) -> Result<WorkflowResult> {
        notify(observer, Stage::Validate);
        let resolution: TargetResolution = target_resolution.parse()?;
        self.store.ensure_disjoint(root)?;

        let _lock = self.store.lock()?;

        notify(observer, Stage::DiscardStale);
        self.store.discard()?;

        notify(observer, Stage::CreateBackup);
        self.store.create()?;

        notify(observer, Stage::Locate);
        let mut collection = self.locate(root)?;
        let targets = ArchiveCollector::collect(&collection, pattern).map_err(|source| {
            Error::NotFound {
                root: root.to_path_buf(),
                source,
            }
        })?;
        if targets.is_empty() {
            info!(root = %collection.root_path(), pattern, "no entries matched");
        }

        notify(observer, Stage::Snapshot);
        let mut records = Vec::with_capacity(targets.archives.len());
        for &id in &targets.archives {
            let archive = collection.archive(id).map_err(|e| io_error(Stage::Snapshot, id, e))?;
            records.push(self.store.snapshot_archive(archive)?);
        }
        self.store.write_manifest(&SnapshotManifest::new(
            collection.root_path().as_str(),
            pattern,
            resolution,
            records,
        ))?;

        notify(observer, Stage::Transform);
        let mut touched = BTreeSet::new();
        let mut entries_transformed = 0;
        for entry in targets.with_suffix(&self.suffix) {
            self.transform_entry(&mut collection, entry, resolution)?;
            touched.insert(entry.archive);
            entries_transformed += 1;
        }

        notify(observer, Stage::Persist);
        for &id in &touched {
            collection
                .save(id)
                .map_err(|e| io_error_in(&collection, Stage::Persist, id, e))?;
        }

        notify(observer, Stage::Report);
        let result = WorkflowResult {
            entries_transformed,
            archives_saved: touched.len(),
            archives_backed_up: targets.archives.len(),
        };
        info!(
            entries = result.entries_transformed,
            saved = result.archives_saved,
            backed_up = result.archives_backed_up,
            "process run complete"
        );
        Ok(result)
    }

    /// Restore the collection at `root` from the backup root.
    pub fn revert(&self, root: &Path) -> Result<RevertReport> {
        revert::revert(&self.opener, &self.store, root)
    }

    /// Remove the backup root under the lock.
    pub fn discard(&self) -> Result<()> {
        let _lock = self.store.lock()?;
        self.store.discard()
    }

    fn locate(&self, root: &Path) -> Result<O::Collection> {
        self.opener.open(root).map_err(|source| Error::NotFound {
            root: root.to_path_buf(),
            source,
        })
    }

    fn transform_entry(
        &self,
        collection: &mut O::Collection,
        entry: &EntryHandle,
        resolution: TargetResolution,
    ) -> Result<()> {
        let payload = collection
            .extract(entry)
            .map_err(|e| io_error_in(collection, Stage::Transform, entry.archive, e))?;
        let rewritten = self
            .transform
            .apply(&payload, resolution.get())
            .map_err(|source| Error::Transform {
                entry: entry.path.clone(),
                source,
            })?;
        collection
            .insert(entry, rewritten)
            .map_err(|e| io_error_in(collection, Stage::Transform, entry.archive, e))?;
        debug!(entry = %entry.path, archive = %entry.archive, "staged transformed entry");
        Ok(())
    }
}

fn notify(observer: &mut dyn FnMut(Stage), stage: Stage) {
    debug!(%stage, "{}", stage.message());
    observer(stage);
}

fn io_error(stage: Stage, id: ArchiveId, source: hudfix_archive::Error) -> Error {
    Error::Io {
        stage,
        archive: id.to_string(),
        source,
    }
}

/// Like [`io_error`], naming the archive by relpath when the collection knows it.
fn io_error_in<C: Collection>(
    collection: &C,
    stage: Stage,
    id: ArchiveId,
    source: hudfix_archive::Error,
) -> Error {
    let archive = collection
        .archive(id)
        .map(|handle| handle.relpath.clone())
        .unwrap_or_else(|_| id.to_string());
    Error::Io {
        stage,
        archive,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hudfix_archive::ArchiveHandle;
    use hudfix_fs::NormalizedPath;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Calls made against a [`FakeCollection`], shared with the test.
    #[derive(Debug, Default)]
    struct Calls {
        extracted: Vec<String>,
        inserted: Vec<String>,
        saved: Vec<ArchiveId>,
    }

    struct FakeCollection {
        root: NormalizedPath,
        archives: Vec<ArchiveHandle>,
        entries: Vec<EntryHandle>,
        calls: Rc<RefCell<Calls>>,
        fail_save: bool,
    }

    impl Collection for FakeCollection {
        fn root_path(&self) -> &NormalizedPath {
            &self.root
        }

        fn archives(&self) -> &[ArchiveHandle] {
            &self.archives
        }

        fn archive(&self, id: ArchiveId) -> hudfix_archive::Result<&ArchiveHandle> {
            self.archives
                .get(id.0)
                .ok_or(hudfix_archive::Error::UnknownArchive(id.0))
        }

        fn search(&self, pattern: &str) -> hudfix_archive::Result<Vec<EntryHandle>> {
            Ok(self
                .entries
                .iter()
                .filter(|e| e.path.starts_with(pattern))
                .cloned()
                .collect())
        }

        fn extract(&self, entry: &EntryHandle) -> hudfix_archive::Result<Vec<u8>> {
            self.calls.borrow_mut().extracted.push(entry.path.clone());
            Ok(b"AnchorX=0.5\n".to_vec())
        }

        fn insert(&mut self, entry: &EntryHandle, _payload: Vec<u8>) -> hudfix_archive::Result<()> {
            self.calls.borrow_mut().inserted.push(entry.path.clone());
            Ok(())
        }

        fn save(&mut self, archive: ArchiveId) -> hudfix_archive::Result<()> {
            if self.fail_save {
                return Err(hudfix_archive::Error::UnknownArchive(archive.0));
            }
            self.calls.borrow_mut().saved.push(archive);
            Ok(())
        }
    }

    /// Archive `A` with one layout and one texture, `B` with one layout.
    struct FakeOpener {
        calls: Rc<RefCell<Calls>>,
        fail_save: bool,
    }

    impl CollectionOpener for FakeOpener {
        type Collection = FakeCollection;

        fn open(&self, root: &Path) -> hudfix_archive::Result<FakeCollection> {
            if !root.is_dir() {
                return Err(hudfix_archive::Error::Open {
                    root: root.to_path_buf(),
                    reason: "not a directory".into(),
                });
            }
            let root = NormalizedPath::new(dunce::canonicalize(root).unwrap());
            let archives = ["A.pak", "B.pak"]
                .iter()
                .enumerate()
                .map(|(i, name)| ArchiveHandle {
                    id: ArchiveId(i),
                    path: root.join(name),
                    relpath: name.to_string(),
                })
                .collect();
            Ok(FakeCollection {
                root,
                archives,
                entries: vec![
                    EntryHandle::new(ArchiveId(0), "HUD/Minimap.ini"),
                    EntryHandle::new(ArchiveId(0), "HUD/Minimap.dds"),
                    EntryHandle::new(ArchiveId(1), "HUD/Chat.ini"),
                ],
                calls: Rc::clone(&self.calls),
                fail_save: self.fail_save,
            })
        }
    }

    fn identity(payload: &[u8], _target: u32) -> hudfix_layout::Result<Vec<u8>> {
        Ok(payload.to_vec())
    }

    type Coordinator = WorkflowCoordinator<FakeOpener, fn(&[u8], u32) -> hudfix_layout::Result<Vec<u8>>>;

    fn setup(fail_save: bool) -> (TempDir, Coordinator, Rc<RefCell<Calls>>) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("game");
        fs::create_dir_all(&root).unwrap();
        for name in ["A.pak", "B.pak"] {
            fs::write(root.join(name), format!("{name} primary")).unwrap();
            fs::write(root.join(format!("{name}.dat")), format!("{name} sidecar")).unwrap();
        }
        let calls = Rc::new(RefCell::new(Calls::default()));
        let opener = FakeOpener {
            calls: Rc::clone(&calls),
            fail_save,
        };
        let store = BackupStore::new(temp.path().join("backup"));
        let transform: fn(&[u8], u32) -> hudfix_layout::Result<Vec<u8>> = identity;
        (temp, WorkflowCoordinator::new(opener, transform, store), calls)
    }

    #[test]
    fn saves_each_touched_archive_once() {
        let (temp, coordinator, calls) = setup(false);

        let result = coordinator.process(&temp.path().join("game"), "HUD/", "1920").unwrap();

        assert_eq!(result.entries_transformed, 2);
        assert_eq!(result.archives_saved, 2);
        assert_eq!(calls.borrow().saved, vec![ArchiveId(0), ArchiveId(1)]);
    }

    #[test]
    fn never_extracts_entries_without_suffix() {
        let (temp, coordinator, calls) = setup(false);

        coordinator.process(&temp.path().join("game"), "HUD/", "1920").unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.extracted, vec!["HUD/Minimap.ini", "HUD/Chat.ini"]);
        assert_eq!(calls.inserted, calls.extracted);
    }

    #[test]
    fn observer_sees_stages_in_order() {
        let (temp, coordinator, _calls) = setup(false);
        let mut seen = Vec::new();

        coordinator
            .process_with(&temp.path().join("game"), "HUD/", "800", &mut |stage| seen.push(stage))
            .unwrap();

        assert_eq!(
            seen,
            vec![
                Stage::Validate,
                Stage::DiscardStale,
                Stage::CreateBackup,
                Stage::Locate,
                Stage::Snapshot,
                Stage::Transform,
                Stage::Persist,
                Stage::Report,
            ]
        );
    }

    #[test]
    fn invalid_resolution_touches_nothing() {
        let (temp, coordinator, calls) = setup(false);
        fs::create_dir_all(temp.path().join("backup/stale")).unwrap();

        let err = coordinator
            .process(&temp.path().join("game"), "HUD/", "abc")
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Validate));
        assert!(temp.path().join("backup/stale").is_dir());
        assert!(!coordinator.store().lock_path().exists());
        assert!(calls.borrow().extracted.is_empty());
    }

    #[test]
    fn save_failure_keeps_backup() {
        let (temp, coordinator, _calls) = setup(true);

        let err = coordinator
            .process(&temp.path().join("game"), "HUD/", "1920")
            .unwrap_err();

        match err {
            Error::Io { stage, archive, .. } => {
                assert_eq!(stage, Stage::Persist);
                assert_eq!(archive, "A.pak");
            }
            other => panic!("expected Io error, got {other:?}"),
        }
        assert_eq!(
            fs::read(coordinator.store().root().to_native().join("A.pak")).unwrap(),
            b"A.pak primary"
        );
    }

    #[test]
    fn missing_root_is_not_found() {
        let (temp, coordinator, _calls) = setup(false);

        let err = coordinator
            .process(&temp.path().join("nowhere"), "HUD/", "1920")
            .unwrap_err();

        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn backup_inside_collection_is_rejected_before_any_stage_runs() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("game");
        fs::create_dir_all(&root).unwrap();
        let calls = Rc::new(RefCell::new(Calls::default()));
        let coordinator = WorkflowCoordinator::new(
            FakeOpener {
                calls: Rc::clone(&calls),
                fail_save: false,
            },
            identity as fn(&[u8], u32) -> hudfix_layout::Result<Vec<u8>>,
            BackupStore::new(root.join("backup")),
        );

        let mut seen = Vec::new();
        let err = coordinator
            .process_with(&root, "HUD/", "1920", &mut |stage| seen.push(stage))
            .unwrap_err();

        assert!(matches!(err, Error::BackupOverlapsCollection { .. }));
        assert_eq!(err.stage(), Some(Stage::Validate));
        assert_eq!(seen, vec![Stage::Validate]);
        assert!(calls.borrow().extracted.is_empty());
    }

    #[test]
    fn result_display_pluralizes() {
        let one = WorkflowResult {
            entries_transformed: 1,
            archives_saved: 1,
            archives_backed_up: 1,
        };
        assert_eq!(one.to_string(), "Transformed 1 entry in 1 archive (1 backed up)");

        let none = WorkflowResult::default();
        assert_eq!(none.to_string(), "Transformed 0 entries in 0 archives (0 backed up)");
    }

    #[test]
    fn unknown_archive_falls_back_to_id() {
        let collection = FakeCollection {
            root: NormalizedPath::new("/r"),
            archives: Vec::new(),
            entries: Vec::new(),
            calls: Rc::new(RefCell::new(Calls::default())),
            fail_save: false,
        };
        let err = io_error_in(
            &collection,
            Stage::Persist,
            ArchiveId(7),
            hudfix_archive::Error::UnknownArchive(7),
        );
        assert!(matches!(err, Error::Io { ref archive, .. } if archive == "#7"));
    }
}
