//! Restoring a collection from its backup root

use std::fmt;
use std::path::Path;

use hudfix_archive::{Collection, CollectionOpener};
use hudfix_fs::{merge_tree, validate_relpath};
use serde::Serialize;
use tracing::{info, warn};

use crate::{BackupStore, Error, Result, Stage};

/// What a revert copied back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RevertReport {
    /// Top-level backup entries merged
    pub entries: usize,
    /// Files overwritten or created under the collection root
    pub files: usize,
    /// Directories created under the collection root
    pub directories: usize,
}

impl fmt::Display for RevertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Restored {} files from backup", self.files)?;
        if self.directories > 0 {
            write!(f, " ({} directories recreated)", self.directories)?;
        }
        Ok(())
    }
}

/// Merge every top-level entry of the backup root onto the collection root.
///
/// The backup is left in place afterwards.
///
/// # Errors
///
/// - `Error::NotFound` if the collection cannot be opened
/// - `Error::NoBackup` if the backup root is absent or empty
/// - `Error::Storage` if a copy fails; files restored before it stay restored
pub fn revert<O: CollectionOpener>(opener: &O, store: &BackupStore, root: &Path) -> Result<RevertReport> {
    store.ensure_disjoint(root)?;
    let _lock = store.lock()?;

    let collection = opener.open(root).map_err(|source| Error::NotFound {
        root: root.to_path_buf(),
        source,
    })?;
    let dest_root = collection.root_path();

    if !store.has_contents() {
        return Err(Error::NoBackup {
            path: store.root().to_native(),
        });
    }
    match store.manifest()? {
        Some(manifest) if manifest.collection_root != dest_root.as_str() => warn!(
            backed_up_from = %manifest.collection_root,
            restoring_to = %dest_root,
            "backup was taken from a different collection root"
        ),
        Some(_) => {}
        None => warn!(
            root = %store.root(),
            "backup has no completion marker; restoring the archives it holds"
        ),
    }

    let ignore = |name: &str| BackupStore::is_bookkeeping(name);
    let mut report = RevertReport::default();
    for name in store.top_level_entries()? {
        validate_relpath(&name).map_err(|e| Error::storage(Stage::Revert, e))?;
        let merged = merge_tree(
            &store.root().join(&name),
            &dest_root.join(&name),
            &ignore,
            store.robustness(),
        )
        .map_err(|e| Error::storage(Stage::Revert, e))?;
        report.entries += 1;
        report.files += merged.files;
        report.directories += merged.directories;
    }

    info!(
        root = %dest_root,
        files = report.files,
        directories = report.directories,
        "reverted collection from backup"
    );
    Ok(report)
}
