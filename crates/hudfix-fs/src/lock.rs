//! Advisory directory locks
//!
//! A `DirLock` guards a resource (such as a backup root) for the duration of
//! one workflow by holding an exclusive `fs2` lock on a companion lock file.
//! Contended acquisition is retried with exponential backoff until the
//! configured timeout elapses.

use backoff::ExponentialBackoff;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::{Error, NormalizedPath, Result};

/// An exclusive lock held until dropped.
#[derive(Debug)]
pub struct DirLock {
    file: File,
    path: PathBuf,
}

impl DirLock {
    /// Acquire an exclusive lock on `path`, creating the lock file if needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::LockFailed` if another holder keeps the lock for
    /// longer than `timeout`, or `Error::Io` if the lock file cannot be opened.
    pub fn acquire(path: &NormalizedPath, timeout: Duration) -> Result<Self> {
        let native = path.to_native();

        if let Some(parent) = native.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&native)
            .map_err(|e| Error::io(&native, e))?;

        let policy = ExponentialBackoff {
            initial_interval: Duration::from_millis(10),
            max_interval: Duration::from_millis(250),
            max_elapsed_time: Some(timeout),
            ..ExponentialBackoff::default()
        };

        backoff::retry(policy, || {
            file.try_lock_exclusive()
                .map_err(backoff::Error::transient)
        })
        .map_err(|_| Error::LockFailed {
            path: native.clone(),
        })?;

        debug!(path = %native.display(), "acquired lock");
        Ok(Self { file, path: native })
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        if FileExt::unlock(&self.file).is_ok() {
            debug!(path = %self.path.display(), "released lock");
        }
    }
}
