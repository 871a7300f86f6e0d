//! Presentation-facing backup status

use serde::Serialize;

use crate::{BackupStore, Result};

/// What a front end should offer next.
///
/// Derived from the backup store and the last run's outcome; the core keeps
/// no UI state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupStatus {
    /// No backup root exists yet
    Idle,
    /// A backup exists; revert and discard are available
    BackupPresent,
    /// No backup; only process is available
    NoBackup,
    /// The last run failed
    Error,
}

impl BackupStatus {
    pub fn derive(store: &BackupStore) -> Self {
        if store.has_contents() {
            Self::BackupPresent
        } else if store.root().exists() {
            Self::NoBackup
        } else {
            Self::Idle
        }
    }

    /// Status after a run finished with `outcome`.
    pub fn after<T>(outcome: &Result<T>, store: &BackupStore) -> Self {
        match outcome {
            Ok(_) => Self::derive(store),
            Err(_) => Self::Error,
        }
    }

    pub fn can_revert(self) -> bool {
        matches!(self, Self::BackupPresent)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::BackupPresent => "backup present",
            Self::NoBackup => "no backup",
            Self::Error => "error",
        }
    }
}
