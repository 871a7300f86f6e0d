//! Settings and backup store shared by every command

use std::path::{Path, PathBuf};

use hudfix_archive::PakOpener;
use hudfix_core::{BackupStore, Settings, WorkflowCoordinator};
use hudfix_layout::CentralReanchor;
use tracing::debug;

use crate::error::Result;

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub settings: Settings,
    pub store: BackupStore,
}

impl RunContext {
    /// Load settings, then apply the global flag overrides.
    pub fn load(config: Option<&Path>, backup_dir: Option<PathBuf>) -> Result<Self> {
        let mut settings = Settings::load(config)?;
        if backup_dir.is_some() {
            settings.backup_dir = backup_dir;
        }
        Ok(Self::from_settings(settings))
    }

    pub fn from_settings(settings: Settings) -> Self {
        let backup_root = settings.backup_root();
        debug!(backup = %backup_root.display(), "resolved backup directory");
        let store = BackupStore::with_robustness(backup_root, settings.robustness());
        Self { settings, store }
    }

    pub fn coordinator(&self) -> WorkflowCoordinator<PakOpener, CentralReanchor> {
        WorkflowCoordinator::new(
            PakOpener::new(self.settings.robustness()),
            CentralReanchor::new(),
            self.store.clone(),
        )
        .with_suffix(self.settings.suffix.clone())
    }
}
