//! Workflow stages

use std::fmt;

/// One step of a process or revert run.
///
/// Errors carry the stage they happened in, and observers are notified
/// before each stage begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validate,
    DiscardStale,
    CreateBackup,
    Locate,
    Snapshot,
    Transform,
    Persist,
    Report,
    Revert,
}

impl Stage {
    /// Status line shown to a user while the stage runs.
    pub fn message(self) -> &'static str {
        match self {
            Self::Validate => "Checking target resolution...",
            Self::DiscardStale => "Removing previous backup...",
            Self::CreateBackup => "Creating backup folder...",
            Self::Locate => "Parsing archive files...",
            Self::Snapshot => "Creating backups...",
            Self::Transform => "Calculating new positions...",
            Self::Persist => "Saving archives...",
            Self::Report => "Done.",
            Self::Revert => "Restoring archives from backup...",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validate => "validation",
            Self::DiscardStale => "backup discard",
            Self::CreateBackup => "backup creation",
            Self::Locate => "collection lookup",
            Self::Snapshot => "snapshot",
            Self::Transform => "transform",
            Self::Persist => "persist",
            Self::Report => "report",
            Self::Revert => "revert",
        };
        f.write_str(name)
    }
}
