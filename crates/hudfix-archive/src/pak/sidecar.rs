//! JSON sidecar describing the entries of a pak archive

use hudfix_fs::{NormalizedPath, checksum, io};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Current sidecar format version
pub const SIDECAR_VERSION: u32 = 1;

/// One entry as recorded in the sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidecarEntry {
    pub path: String,
    pub size: u64,
    pub checksum: String,
}

impl SidecarEntry {
    pub fn describe(path: impl Into<String>, payload: &[u8]) -> Self {
        Self {
            path: path.into(),
            size: payload.len() as u64,
            checksum: checksum::compute_checksum(payload),
        }
    }
}

/// Contents of a `<archive>.dat` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidecarManifest {
    pub version: u32,
    pub entries: Vec<SidecarEntry>,
}

impl SidecarManifest {
    pub fn new(entries: Vec<SidecarEntry>) -> Self {
        Self {
            version: SIDECAR_VERSION,
            entries,
        }
    }

    /// Read and parse a sidecar file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let bytes = io::read_bytes(path)?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Sidecar {
            path: path.to_native(),
            reason: e.to_string(),
        })
    }

    /// Serialize for writing next to the archive.
    pub fn to_bytes(&self, path: &NormalizedPath) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| Error::Sidecar {
            path: path.to_native(),
            reason: e.to_string(),
        })
    }

    /// Look up the record for a virtual path.
    pub fn entry(&self, path: &str) -> Option<&SidecarEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }
}
