//! Handles identifying archives and the entries inside them

use hudfix_fs::{HudPath, NormalizedPath};
use std::fmt;

/// Index of an archive within its owning collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchiveId(pub usize);

impl fmt::Display for ArchiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One packaged archive on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHandle {
    pub id: ArchiveId,
    /// Absolute path of the primary file
    pub path: NormalizedPath,
    /// Path relative to the collection root; used as the backup key
    pub relpath: String,
}

impl ArchiveHandle {
    /// Absolute path of the companion metadata file.
    pub fn sidecar_path(&self) -> NormalizedPath {
        let name = self.path.file_name().unwrap_or_default();
        match self.path.parent() {
            Some(parent) => parent.join(&HudPath::sidecar_for(name)),
            None => NormalizedPath::new(HudPath::sidecar_for(name)),
        }
    }

    /// Relative key of the companion metadata file.
    pub fn sidecar_relpath(&self) -> String {
        HudPath::sidecar_for(&self.relpath)
    }
}

/// One logical file inside an archive, addressed by its virtual path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryHandle {
    /// Virtual path inside the archive
    pub path: String,
    /// Archive that owns this entry
    pub archive: ArchiveId,
}

impl EntryHandle {
    pub fn new(archive: ArchiveId, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            archive,
        }
    }

    /// Whether the virtual path ends with `suffix`, ignoring ASCII case.
    pub fn has_suffix(&self, suffix: &str) -> bool {
        let path = self.path.as_bytes();
        let suffix = suffix.as_bytes();
        path.len() >= suffix.len()
            && path[path.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
    }
}
