//! Shared test fixtures for the hudfix workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`collection`]: [`TestCollection`] builder for pak collections on disk

pub mod collection;

pub use collection::{
    ARCHIVE_A, ARCHIVE_B, CHAT, MINIMAP, PATTERN, SOUND, TEXTURE, TestCollection,
};
