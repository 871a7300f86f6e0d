//! Error types for hudfix-archive

use std::path::PathBuf;

/// Result type for archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening, searching or rewriting archives
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The collection root could not be opened or indexed
    #[error("Cannot open archive collection at {root}: {reason}")]
    Open { root: PathBuf, reason: String },

    /// The search pattern is malformed
    #[error("Invalid search pattern {pattern:?}: {reason}")]
    Search { pattern: String, reason: String },

    /// A handle refers to an archive this collection does not own
    #[error("Unknown archive id {0}")]
    UnknownArchive(usize),

    /// A handle refers to an entry that is not in its archive
    #[error("Entry {path} not found in archive {archive}")]
    EntryNotFound { archive: String, path: String },

    /// The zip container is unreadable or could not be written
    #[error("Zip error in {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The sidecar metadata file is missing or malformed
    #[error("Sidecar {path}: {reason}")]
    Sidecar { path: PathBuf, reason: String },

    /// Filesystem error from hudfix-fs
    #[error(transparent)]
    Fs(#[from] hudfix_fs::Error),
}

impl Error {
    pub(crate) fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            source,
        }
    }
}
