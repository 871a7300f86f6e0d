//! Run settings loaded from `hudfix.toml`
//!
//! Settings are looked up in this order, first hit wins:
//! 1. An explicit path (`--config`)
//! 2. `hudfix.toml` in the working directory
//! 3. `hudfix/hudfix.toml` under the platform config directory
//!
//! With no file, every field takes its default. Command-line flags override
//! whatever was loaded.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hudfix_fs::{ConfigStore, HudPath, NormalizedPath, RobustnessConfig};
use hudfix_layout::LAYOUT_SUFFIX;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;

const APP_DIR: &str = "hudfix";

fn default_pattern() -> String {
    "DATA/Menu/HUD/Elements/".to_string()
}

fn default_resolution() -> i64 {
    1920
}

fn default_suffix() -> String {
    LAYOUT_SUFFIX.to_string()
}

fn default_lock_timeout_ms() -> u64 {
    5000
}

fn default_fsync() -> bool {
    true
}

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Backup root; defaults to the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    /// Search pattern selecting the layout entries
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Single-monitor width in pixels. Kept raw so a bad value is reported
    /// by validation when a run starts rather than when the file loads.
    #[serde(default = "default_resolution")]
    pub resolution: i64,

    /// Suffix of the entries the transform applies to
    #[serde(default = "default_suffix")]
    pub suffix: String,

    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    #[serde(default = "default_fsync")]
    pub fsync: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backup_dir: None,
            pattern: default_pattern(),
            resolution: default_resolution(),
            suffix: default_suffix(),
            lock_timeout_ms: default_lock_timeout_ms(),
            fsync: default_fsync(),
        }
    }
}

impl Settings {
    /// Load from `explicit` if given, else from the first settings file found.
    ///
    /// An explicit path that does not exist is an error; a missing
    /// discovered file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(&NormalizedPath::new(path)),
            None => Self::discover(&Self::candidates()),
        }
    }

    /// Load the first of `candidates` that exists, or defaults.
    pub fn discover(candidates: &[PathBuf]) -> Result<Self> {
        for candidate in candidates {
            let path = NormalizedPath::new(candidate);
            if path.is_file() {
                return Self::load_file(&path);
            }
        }
        debug!("no settings file found; using defaults");
        Ok(Self::default())
    }

    fn load_file(path: &NormalizedPath) -> Result<Self> {
        let settings = ConfigStore::new().load(path)?;
        debug!(path = %path, "loaded settings");
        Ok(settings)
    }

    fn candidates() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from(HudPath::SettingsFile.as_str())];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(APP_DIR).join(HudPath::SettingsFile.as_str()));
        }
        candidates
    }

    /// The configured backup root, or the platform default.
    pub fn backup_root(&self) -> PathBuf {
        self.backup_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join(APP_DIR).join(HudPath::BackupDir.as_str()))
                .unwrap_or_else(|| PathBuf::from(HudPath::BackupDir.as_str()))
        })
    }

    pub fn robustness(&self) -> RobustnessConfig {
        RobustnessConfig {
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            enable_fsync: self.fsync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = toml::from_str("resolution = 2560").unwrap();

        assert_eq!(settings.resolution, 2560);
        assert_eq!(settings.pattern, "DATA/Menu/HUD/Elements/");
        assert_eq!(settings.suffix, ".ini");
        assert_eq!(settings.backup_dir, None);
    }

    #[test]
    fn discover_picks_first_existing_candidate() {
        let temp = TempDir::new().unwrap();
        let second = temp.path().join("second.toml");
        fs::write(&second, "pattern = \"UI/\"\nfsync = false\n").unwrap();

        let settings =
            Settings::discover(&[temp.path().join("missing.toml"), second]).unwrap();

        assert_eq!(settings.pattern, "UI/");
        assert!(!settings.robustness().enable_fsync);
    }

    #[test]
    fn discover_without_files_is_default() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::discover(&[temp.path().join("none.toml")]).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(Settings::load(Some(&temp.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn explicit_backup_dir_wins() {
        let settings = Settings {
            backup_dir: Some(PathBuf::from("/srv/hudfix")),
            ..Settings::default()
        };
        assert_eq!(settings.backup_root(), PathBuf::from("/srv/hudfix"));
    }

    #[test]
    fn robustness_follows_lock_timeout() {
        let settings = Settings {
            lock_timeout_ms: 250,
            ..Settings::default()
        };
        assert_eq!(settings.robustness().lock_timeout, Duration::from_millis(250));
    }
}
