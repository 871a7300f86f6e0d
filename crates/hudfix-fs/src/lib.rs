//! Filesystem layer for hudfix
//!
//! Provides normalized path handling, all-or-nothing file writes, the
//! recursive tree merge used to restore backups, and advisory directory locks.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod lock;
pub mod merge;
pub mod path;

pub use config::ConfigStore;
pub use constants::HudPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use lock::DirLock;
pub use merge::{MergeReport, merge_tree};
pub use path::{NormalizedPath, validate_relpath};
