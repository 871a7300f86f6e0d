//! Archive collections for hudfix
//!
//! Defines the contract the backup/transform workflow consumes
//! ([`Collection`], [`CollectionOpener`], [`ArchiveHandle`], [`EntryHandle`])
//! and one implementation of it: [`PakCollection`], a directory of zip
//! containers (`*.pak`) each paired with a JSON sidecar (`*.pak.dat`).
//!
//! Entries are addressed through handles that carry an [`ArchiveId`]
//! instead of a reference, so the collection stays the single owner of all
//! archive state and staged payloads.

pub mod collection;
pub mod error;
pub mod handle;
pub mod pak;

pub use collection::{Collection, CollectionOpener};
pub use error::{Error, Result};
pub use handle::{ArchiveHandle, ArchiveId, EntryHandle};
pub use pak::{PakCollection, PakOpener, SidecarEntry, SidecarManifest, write_pak};
