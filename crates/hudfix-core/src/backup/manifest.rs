//! Snapshot completion marker and verification results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TargetResolution;

/// Copies recorded for one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Archive relpath (the backup key)
    pub relpath: String,
    /// Checksum of the primary file at backup time
    pub checksum: String,
    /// Checksum of the sidecar at backup time
    pub sidecar_checksum: String,
}

/// Written into the backup root after every archive has been copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    /// When the snapshot was completed
    pub created: DateTime<Utc>,
    /// Canonical root of the collection the archives came from
    pub collection_root: String,
    /// Search pattern of the run
    pub pattern: String,
    /// Target resolution the run transformed for
    pub target_resolution: TargetResolution,
    /// One record per backed up archive
    #[serde(default)]
    pub archives: Vec<SnapshotRecord>,
}

impl SnapshotManifest {
    pub fn new(
        collection_root: impl Into<String>,
        pattern: impl Into<String>,
        target_resolution: TargetResolution,
        archives: Vec<SnapshotRecord>,
    ) -> Self {
        Self {
            created: Utc::now(),
            collection_root: collection_root.into(),
            pattern: pattern.into(),
            target_resolution,
            archives,
        }
    }

    /// Whether the snapshot covers the archive stored under `relpath`.
    pub fn covers(&self, relpath: &str) -> bool {
        self.archives.iter().any(|record| record.relpath == relpath)
    }
}

/// Outcome of checking stored copies against their recorded checksums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Files whose checksum matches
    pub verified: Vec<String>,
    /// Files present but with different content
    pub mismatched: Vec<String>,
    /// Files recorded but absent
    pub missing: Vec<String>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.mismatched.is_empty() && self.missing.is_empty()
    }
}
