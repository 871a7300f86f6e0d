//! The collection contract consumed by the workflow

use std::path::Path;

use hudfix_fs::NormalizedPath;

use crate::{ArchiveHandle, ArchiveId, EntryHandle, Result};

/// An indexed set of archives under one root directory.
///
/// `insert` only stages a payload; nothing reaches disk until `save` is
/// called for the owning archive.
pub trait Collection {
    /// Canonical root directory of the collection.
    fn root_path(&self) -> &NormalizedPath;

    /// Every archive the collection indexed.
    fn archives(&self) -> &[ArchiveHandle];

    /// Look up one archive by id.
    fn archive(&self, id: ArchiveId) -> Result<&ArchiveHandle>;

    /// Entries whose virtual path matches `pattern`.
    fn search(&self, pattern: &str) -> Result<Vec<EntryHandle>>;

    /// Current payload of an entry, including any staged replacement.
    fn extract(&self, entry: &EntryHandle) -> Result<Vec<u8>>;

    /// Stage a replacement payload for an entry.
    fn insert(&mut self, entry: &EntryHandle, payload: Vec<u8>) -> Result<()>;

    /// Persist one archive, writing its staged payloads.
    fn save(&mut self, archive: ArchiveId) -> Result<()>;
}

/// Opens collections rooted at a directory.
pub trait CollectionOpener {
    type Collection: Collection;

    fn open(&self, root: &Path) -> Result<Self::Collection>;
}
