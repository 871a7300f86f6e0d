//! Backup root lifecycle: create, discard, snapshot, verify

use std::fs;
use std::path::{Path, PathBuf};

use hudfix_archive::ArchiveHandle;
use hudfix_fs::{
    ConfigStore, DirLock, HudPath, NormalizedPath, RobustnessConfig, checksum, io,
    validate_relpath,
};
use tracing::{debug, info, warn};

use super::{SnapshotManifest, SnapshotRecord, VerifyReport};
use crate::{Error, Result, Stage};

/// Owns one backup root directory.
///
/// The store assumes it is the only writer of its root for the duration of
/// a run; [`BackupStore::lock`] enforces that across processes.
#[derive(Debug, Clone)]
pub struct BackupStore {
    root: NormalizedPath,
    robustness: RobustnessConfig,
}

impl BackupStore {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self::with_robustness(root, RobustnessConfig::default())
    }

    pub fn with_robustness(root: impl Into<NormalizedPath>, robustness: RobustnessConfig) -> Self {
        Self {
            root: root.into(),
            robustness,
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn robustness(&self) -> RobustnessConfig {
        self.robustness
    }

    /// Lock file guarding this root; kept outside it so discard leaves it alone.
    pub fn lock_path(&self) -> NormalizedPath {
        NormalizedPath::new(format!(
            "{}.{}",
            self.root.as_str().trim_end_matches('/'),
            HudPath::LockExtension.as_str()
        ))
    }

    /// Refuse a collection root that equals, contains or lies inside this root.
    ///
    /// Runs before anything is discarded. A collection root that does not
    /// resolve is left for Locate to report.
    pub fn ensure_disjoint(&self, collection_root: &Path) -> Result<()> {
        let Ok(collection) = dunce::canonicalize(collection_root) else {
            return Ok(());
        };
        let collection = NormalizedPath::new(collection);
        let backup = resolve_lenient(&self.root.to_native());

        if backup.strip_prefix(&collection).is_some() || collection.strip_prefix(&backup).is_some() {
            warn!(backup = %backup, root = %collection, "backup root overlaps the collection");
            return Err(Error::BackupOverlapsCollection {
                backup: backup.to_native(),
                root: collection.to_native(),
            });
        }
        Ok(())
    }

    /// Take the exclusive lock for one run.
    pub fn lock(&self) -> Result<DirLock> {
        DirLock::acquire(&self.lock_path(), self.robustness.lock_timeout).map_err(|e| match e {
            hudfix_fs::Error::LockFailed { .. } => Error::Locked {
                path: self.root.to_native(),
            },
            other => Error::storage(Stage::CreateBackup, other),
        })
    }

    /// Recreate the root empty, deleting anything already there.
    pub fn create(&self) -> Result<()> {
        self.remove_root(Stage::CreateBackup)?;
        let native = self.root.to_native();
        fs::create_dir_all(&native)
            .map_err(|e| Error::storage(Stage::CreateBackup, hudfix_fs::Error::io(&native, e)))?;
        info!(root = %self.root, "created empty backup root");
        Ok(())
    }

    /// Remove the root and everything in it; a no-op when absent.
    pub fn discard(&self) -> Result<()> {
        self.remove_root(Stage::DiscardStale)?;
        info!(root = %self.root, "discarded backup");
        Ok(())
    }

    fn remove_root(&self, stage: Stage) -> Result<()> {
        let native = self.root.to_native();
        let removal = match fs::symlink_metadata(&native) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&native),
            Ok(_) => fs::remove_file(&native),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => Err(e),
        };
        removal.map_err(|e| Error::storage(stage, hudfix_fs::Error::io(&native, e)))
    }

    /// True iff the root exists and holds at least one entry.
    pub fn has_contents(&self) -> bool {
        fs::read_dir(self.root.to_native())
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    /// Store an archive's primary and sidecar bytes under `archive_relpath`.
    pub fn snapshot(
        &self,
        archive_relpath: &str,
        archive_bytes: &[u8],
        sidecar_bytes: &[u8],
    ) -> Result<SnapshotRecord> {
        validate_relpath(archive_relpath).map_err(|e| Error::storage(Stage::Snapshot, e))?;

        let primary = self.root.join(archive_relpath);
        let sidecar = self.root.join(&HudPath::sidecar_for(archive_relpath));
        io::write_atomic(&primary, archive_bytes, self.robustness)
            .map_err(|e| Error::storage(Stage::Snapshot, e))?;
        io::write_atomic(&sidecar, sidecar_bytes, self.robustness)
            .map_err(|e| Error::storage(Stage::Snapshot, e))?;

        debug!(relpath = archive_relpath, bytes = archive_bytes.len(), "snapshotted archive");
        Ok(SnapshotRecord {
            relpath: archive_relpath.to_string(),
            checksum: checksum::compute_checksum(archive_bytes),
            sidecar_checksum: checksum::compute_checksum(sidecar_bytes),
        })
    }

    /// Read an archive's persisted files and snapshot them.
    pub fn snapshot_archive(&self, archive: &ArchiveHandle) -> Result<SnapshotRecord> {
        let primary =
            io::read_bytes(&archive.path).map_err(|e| Error::storage(Stage::Snapshot, e))?;
        let sidecar = io::read_bytes(&archive.sidecar_path())
            .map_err(|e| Error::storage(Stage::Snapshot, e))?;
        self.snapshot(&archive.relpath, &primary, &sidecar)
    }

    fn manifest_path(&self) -> NormalizedPath {
        self.root.join(HudPath::SnapshotManifest.as_str())
    }

    /// Mark the snapshot complete.
    pub fn write_manifest(&self, manifest: &SnapshotManifest) -> Result<()> {
        ConfigStore::with_robustness(self.robustness)
            .save(&self.manifest_path(), manifest)
            .map_err(|e| Error::storage(Stage::Snapshot, e))
    }

    /// The completion marker, if the last snapshot finished.
    pub fn manifest(&self) -> Result<Option<SnapshotManifest>> {
        let path = self.manifest_path();
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(ConfigStore::new().load(&path)?))
    }

    /// Names directly under the root, excluding the completion marker.
    pub fn top_level_entries(&self) -> Result<Vec<String>> {
        let native = self.root.to_native();
        let mut names = Vec::new();
        for entry in fs::read_dir(&native).map_err(|e| hudfix_fs::Error::io(&native, e))? {
            let entry = entry.map_err(|e| hudfix_fs::Error::io(&native, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !Self::is_bookkeeping(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Files the store writes for itself rather than copies of archives:
    /// the completion marker and temp files left by an interrupted write.
    pub fn is_bookkeeping(name: &str) -> bool {
        name == HudPath::SnapshotManifest.as_str() || (name.starts_with('.') && name.ends_with(".tmp"))
    }

    /// Compare every stored copy with the checksum recorded at backup time.
    pub fn verify(&self) -> Result<VerifyReport> {
        if !self.has_contents() {
            return Err(Error::NoBackup {
                path: self.root.to_native(),
            });
        }
        let Some(manifest) = self.manifest()? else {
            return Err(Error::IncompleteSnapshot {
                path: self.root.to_native(),
            });
        };

        let mut report = VerifyReport::default();
        for record in &manifest.archives {
            let copies = [
                (record.relpath.clone(), &record.checksum),
                (HudPath::sidecar_for(&record.relpath), &record.sidecar_checksum),
            ];
            for (relpath, expected) in copies {
                let path = self.root.join(&relpath);
                if !path.is_file() {
                    report.missing.push(relpath);
                } else if checksum::compute_file_checksum(&path)? == *expected {
                    report.verified.push(relpath);
                } else {
                    warn!(relpath, "backup copy does not match its recorded checksum");
                    report.mismatched.push(relpath);
                }
            }
        }
        Ok(report)
    }
}

/// Canonicalize the nearest existing ancestor of `path` and re-append the rest.
fn resolve_lenient(path: &Path) -> NormalizedPath {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut existing: &Path = &absolute;
    let mut missing: Vec<&std::ffi::OsStr> = Vec::new();
    loop {
        if let Ok(canonical) = dunce::canonicalize(existing) {
            let resolved: PathBuf = missing.iter().rev().fold(canonical, |acc, part| acc.join(part));
            return NormalizedPath::new(resolved);
        }
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return NormalizedPath::new(absolute.as_path()),
        }
    }
}
