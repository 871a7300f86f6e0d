//! Backup store for archive snapshots
//!
//! A backup root mirrors the collection's relative layout. For every
//! archive a run will modify it holds a byte-identical copy of the primary
//! file and of its `.dat` sidecar, keyed by the archive's relpath:
//!
//! ```text
//! backup/
//!   .snapshot.toml            written last; marks the snapshot complete
//!   0.0.0.1/Archive_1.pak
//!   0.0.0.1/Archive_1.pak.dat
//! backup.lock                 sibling lock file, survives discard
//! ```

mod manifest;
mod store;

pub use manifest::{SnapshotManifest, SnapshotRecord, VerifyReport};
pub use store::BackupStore;
