//! Well-known file names used by hudfix.

use std::path::Path;

/// Standard hudfix filesystem markers and names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudPath {
    /// Default backup directory name (`backup`)
    BackupDir,
    /// Completion marker written into a backup root once every archive is copied
    SnapshotManifest,
    /// Extension of the lock file kept next to the backup root
    LockExtension,
    /// Extension of an archive's companion metadata file
    SidecarExtension,
    /// Optional settings file (`hudfix.toml`)
    SettingsFile,
}

impl HudPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BackupDir => "backup",
            Self::SnapshotManifest => ".snapshot.toml",
            Self::LockExtension => "lock",
            Self::SidecarExtension => "dat",
            Self::SettingsFile => "hudfix.toml",
        }
    }

    /// Name of the sidecar belonging to the primary file `name`.
    ///
    /// `Archive_1.pak` -> `Archive_1.pak.dat`
    pub fn sidecar_for(name: &str) -> String {
        format!("{}.{}", name, Self::SidecarExtension.as_str())
    }
}

impl AsRef<Path> for HudPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for HudPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for HudPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
