//! Backup, transform and revert workflow for hudfix
//!
//! This crate sequences in-place edits of packaged archives so that the
//! original bytes can always be restored:
//!
//! - **BackupStore**: one backup root; create, discard, snapshot, verify
//! - **ArchiveCollector**: matching entries and the distinct archives owning them
//! - **WorkflowCoordinator**: validate, discard stale backup, create backup,
//!   locate, snapshot every target, transform, persist, report
//! - **revert**: merge the backup tree back onto the collection root
//!
//! # Architecture
//!
//! ```text
//!                     hudfix-cli
//!                         |
//!                    hudfix-core
//!                         |
//!        +----------------+----------------+
//!        |                |                |
//!    hudfix-fs     hudfix-archive    hudfix-layout
//! ```
//!
//! # Ordering
//!
//! A run never transforms an entry before every archive it will touch has
//! been copied into the backup root, and never creates the backup root
//! without first discarding whatever a previous run left there.

pub mod backup;
pub mod collector;
pub mod error;
pub mod revert;
pub mod settings;
pub mod stage;
pub mod status;
pub mod target;
pub mod workflow;

pub use backup::{BackupStore, SnapshotManifest, SnapshotRecord, VerifyReport};
pub use collector::{ArchiveCollector, Targets};
pub use error::{Error, Result};
pub use revert::{RevertReport, revert};
pub use settings::Settings;
pub use stage::Stage;
pub use status::BackupStatus;
pub use target::TargetResolution;
pub use workflow::{WorkflowCoordinator, WorkflowResult};
