//! Recursive tree merge
//!
//! Copies a directory tree onto another, creating missing directories and
//! replacing files that already exist. Each file is replaced through
//! [`io::copy_atomic`], so an interrupted merge leaves every destination
//! file either untouched or fully replaced.

use std::fs;
use tracing::debug;

use crate::{Error, NormalizedPath, Result, io};

/// Counts of what a merge touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Files written at the destination
    pub files: usize,
    /// Directories that had to be created at the destination
    pub directories: usize,
}

impl MergeReport {
    fn absorb(&mut self, other: MergeReport) {
        self.files += other.files;
        self.directories += other.directories;
    }
}

/// Merge `src` onto `dest`.
///
/// A directory source ensures `dest` exists as a directory and merges every
/// child not rejected by `ignore`; `ignore` receives the child's file name
/// at every level. A file source overwrites `dest` byte for byte.
///
/// # Errors
///
/// Returns `Error::Io` if `src` does not exist or any read, directory
/// creation or write fails. Files merged before the failure stay merged.
pub fn merge_tree(
    src: &NormalizedPath,
    dest: &NormalizedPath,
    ignore: &dyn Fn(&str) -> bool,
    config: io::RobustnessConfig,
) -> Result<MergeReport> {
    let src_native = src.to_native();
    let metadata = fs::metadata(&src_native).map_err(|e| Error::io(&src_native, e))?;

    if !metadata.is_dir() {
        io::copy_atomic(src, dest, config)?;
        debug!(from = %src, to = %dest, "merged file");
        return Ok(MergeReport {
            files: 1,
            directories: 0,
        });
    }

    let mut report = MergeReport::default();
    let dest_native = dest.to_native();
    if !dest_native.is_dir() {
        fs::create_dir_all(&dest_native).map_err(|e| Error::io(&dest_native, e))?;
        report.directories += 1;
    }

    let mut children: Vec<String> = fs::read_dir(&src_native)
        .map_err(|e| Error::io(&src_native, e))?
        .map(|entry| {
            entry
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .map_err(|e| Error::io(&src_native, e))
        })
        .collect::<Result<_>>()?;
    children.sort();

    for name in children.iter().filter(|name| !ignore(name)) {
        report.absorb(merge_tree(&src.join(name), &dest.join(name), ignore, config)?);
    }

    Ok(report)
}

/// An `ignore` filter that keeps everything.
pub fn keep_all(_name: &str) -> bool {
    false
}
