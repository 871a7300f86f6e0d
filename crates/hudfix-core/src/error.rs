//! Error types for hudfix-core

use std::path::PathBuf;

use crate::Stage;

/// Result type for hudfix-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a process, revert or discard run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target resolution is not a positive integer
    #[error("Invalid target resolution {input:?}: {reason}")]
    Validation { input: String, reason: String },

    /// The backup root could not be created, discarded or written
    #[error("Backup storage failed during {stage} at {path}: {source}")]
    Storage {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: hudfix_fs::Error,
    },

    /// The archive collection could not be opened or searched
    #[error("Archive collection not found at {root}: {source}")]
    NotFound {
        root: PathBuf,
        #[source]
        source: hudfix_archive::Error,
    },

    /// Reading, staging or saving an archive failed
    #[error("Archive I/O failed during {stage} for {archive}: {source}")]
    Io {
        stage: Stage,
        archive: String,
        #[source]
        source: hudfix_archive::Error,
    },

    /// The layout transform rejected an entry's payload
    #[error("Transform failed for {entry}: {source}")]
    Transform {
        entry: String,
        #[source]
        source: hudfix_layout::Error,
    },

    /// The backup root equals, contains or lies inside the collection root
    #[error("Backup directory {backup} overlaps the collection root {root}")]
    BackupOverlapsCollection { backup: PathBuf, root: PathBuf },

    /// Revert or verify was asked for but the backup root is empty
    #[error("No backup found at {path}")]
    NoBackup { path: PathBuf },

    /// The backup root holds files but no completion marker
    #[error("Backup at {path} is incomplete; it was interrupted before every archive was copied")]
    IncompleteSnapshot { path: PathBuf },

    /// Another run holds the backup lock
    #[error("Backup directory {path} is locked by another run")]
    Locked { path: PathBuf },

    /// Filesystem error from hudfix-fs
    #[error(transparent)]
    Fs(#[from] hudfix_fs::Error),
}

impl Error {
    pub(crate) fn storage(stage: Stage, source: hudfix_fs::Error) -> Self {
        let path = source.path().map(PathBuf::from).unwrap_or_default();
        Self::Storage {
            stage,
            path,
            source,
        }
    }

    /// The stage the run failed in, when the error belongs to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Validation { .. } | Self::BackupOverlapsCollection { .. } => {
                Some(Stage::Validate)
            }
            Self::Storage { stage, .. } | Self::Io { stage, .. } => Some(*stage),
            Self::NotFound { .. } => Some(Stage::Locate),
            Self::Transform { .. } => Some(Stage::Transform),
            Self::NoBackup { .. } | Self::IncompleteSnapshot { .. } => Some(Stage::Revert),
            Self::Locked { .. } | Self::Fs(_) => None,
        }
    }
}
