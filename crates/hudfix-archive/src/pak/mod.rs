//! Zip-backed pak archives
//!
//! A pak collection is a directory tree containing `*.pak` files. Each pak
//! is a zip container whose file entries are the archive's virtual paths,
//! and each has a `<name>.pak.dat` sidecar listing size and checksum of
//! every entry. Saving rewrites both files through atomic writes.

mod sidecar;

pub use sidecar::{SIDECAR_VERSION, SidecarEntry, SidecarManifest};

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use hudfix_fs::{NormalizedPath, RobustnessConfig, io};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::{ArchiveHandle, ArchiveId, Collection, CollectionOpener, EntryHandle, Error, Result};

/// File extension of pak archives
pub const PAK_EXTENSION: &str = "pak";

/// Opens [`PakCollection`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PakOpener {
    robustness: RobustnessConfig,
}

impl PakOpener {
    pub fn new(robustness: RobustnessConfig) -> Self {
        Self { robustness }
    }
}

impl CollectionOpener for PakOpener {
    type Collection = PakCollection;

    fn open(&self, root: &Path) -> Result<PakCollection> {
        PakCollection::open_with(root, self.robustness)
    }
}

/// A directory of pak archives with staged, not yet saved, payloads.
#[derive(Debug)]
pub struct PakCollection {
    root: NormalizedPath,
    archives: Vec<ArchiveHandle>,
    /// File entry names per archive, in container order
    entries: Vec<Vec<String>>,
    staged: HashMap<ArchiveId, BTreeMap<String, Vec<u8>>>,
    robustness: RobustnessConfig,
}

impl PakCollection {
    /// Index every pak under `root`.
    pub fn open(root: &Path) -> Result<Self> {
        Self::open_with(root, RobustnessConfig::default())
    }

    pub fn open_with(root: &Path, robustness: RobustnessConfig) -> Result<Self> {
        let open_error = |reason: String| Error::Open {
            root: root.to_path_buf(),
            reason,
        };

        if !root.is_dir() {
            return Err(open_error("not a directory".into()));
        }
        let canonical = dunce::canonicalize(root).map_err(|e| open_error(e.to_string()))?;
        let root_path = NormalizedPath::new(&canonical);
        if root_path.is_network_path() {
            warn!(root = %root_path, "collection is on a network path; I/O may be slow");
        }

        let paths = find_archives(&canonical).map_err(|e| open_error(e.to_string()))?;
        let mut archives = Vec::with_capacity(paths.len());
        let mut entries = Vec::with_capacity(paths.len());

        for (index, path) in paths.into_iter().enumerate() {
            let path = NormalizedPath::new(&path);
            let relpath = path
                .strip_prefix(&root_path)
                .ok_or_else(|| open_error(format!("{} is outside the root", path)))?;
            let handle = ArchiveHandle {
                id: ArchiveId(index),
                path,
                relpath,
            };

            let sidecar = handle.sidecar_path();
            if !sidecar.is_file() {
                return Err(Error::Sidecar {
                    path: sidecar.to_native(),
                    reason: "missing companion metadata file".into(),
                });
            }

            entries.push(list_entries(&handle.path)?);
            archives.push(handle);
        }

        info!(root = %root_path, archives = archives.len(), "opened pak collection");
        Ok(Self {
            root: root_path,
            archives,
            entries,
            staged: HashMap::new(),
            robustness,
        })
    }

    /// Number of payloads staged but not yet saved.
    pub fn staged_count(&self) -> usize {
        self.staged.values().map(BTreeMap::len).sum()
    }

    fn check_entry(&self, entry: &EntryHandle) -> Result<&ArchiveHandle> {
        let handle = self.archive(entry.archive)?;
        if self.entries[entry.archive.0].iter().any(|name| *name == entry.path) {
            Ok(handle)
        } else {
            Err(Error::EntryNotFound {
                archive: handle.relpath.clone(),
                path: entry.path.clone(),
            })
        }
    }
}

impl Collection for PakCollection {
    fn root_path(&self) -> &NormalizedPath {
        &self.root
    }

    fn archives(&self) -> &[ArchiveHandle] {
        &self.archives
    }

    fn archive(&self, id: ArchiveId) -> Result<&ArchiveHandle> {
        self.archives.get(id.0).ok_or(Error::UnknownArchive(id.0))
    }

    /// Entries whose virtual path starts with `pattern`, ignoring case.
    ///
    /// An empty pattern matches every entry. Absolute patterns and patterns
    /// containing `..` are rejected.
    fn search(&self, pattern: &str) -> Result<Vec<EntryHandle>> {
        let normalized = pattern.replace('\\', "/");
        if normalized.starts_with('/') {
            return Err(Error::Search {
                pattern: pattern.to_string(),
                reason: "pattern must be relative to the archive root".into(),
            });
        }
        if normalized.split('/').any(|component| component == "..") {
            return Err(Error::Search {
                pattern: pattern.to_string(),
                reason: "pattern must not contain '..'".into(),
            });
        }
        let needle = normalized.to_lowercase();

        let mut found: Vec<EntryHandle> = self
            .archives
            .iter()
            .zip(&self.entries)
            .flat_map(|(handle, names)| {
                names
                    .iter()
                    .filter(|name| name.replace('\\', "/").to_lowercase().starts_with(&needle))
                    .map(|name| EntryHandle::new(handle.id, name.clone()))
            })
            .collect();
        found.sort_by(|a, b| (a.archive, &a.path).cmp(&(b.archive, &b.path)));

        debug!(pattern, matches = found.len(), "searched collection");
        Ok(found)
    }

    fn extract(&self, entry: &EntryHandle) -> Result<Vec<u8>> {
        let handle = self.check_entry(entry)?;
        if let Some(payload) = self
            .staged
            .get(&entry.archive)
            .and_then(|staged| staged.get(&entry.path))
        {
            return Ok(payload.clone());
        }

        let native = handle.path.to_native();
        let mut archive = open_zip(&native)?;
        let mut file = archive
            .by_name(&entry.path)
            .map_err(|e| Error::zip(&native, e))?;
        let mut payload = Vec::new();
        file.read_to_end(&mut payload)
            .map_err(|e| hudfix_fs::Error::io(&native, e))?;
        Ok(payload)
    }

    fn insert(&mut self, entry: &EntryHandle, payload: Vec<u8>) -> Result<()> {
        self.check_entry(entry)?;
        self.staged
            .entry(entry.archive)
            .or_default()
            .insert(entry.path.clone(), payload);
        Ok(())
    }

    fn save(&mut self, id: ArchiveId) -> Result<()> {
        let handle = self.archive(id)?.clone();
        let native = handle.path.to_native();
        let staged = self.staged.get(&id);

        let mut archive = open_zip(&native)?;
        let mut packed = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| Error::zip(&native, e))?;
            let name = file.name().to_string();
            let method = file.compression();

            if file.is_dir() {
                packed.push(PackedEntry {
                    name,
                    method,
                    payload: None,
                });
                continue;
            }

            let payload = match staged.and_then(|staged| staged.get(&name)) {
                Some(replacement) => replacement.clone(),
                None => {
                    let mut original = Vec::new();
                    file.read_to_end(&mut original)
                        .map_err(|e| hudfix_fs::Error::io(&native, e))?;
                    original
                }
            };
            packed.push(PackedEntry {
                name,
                method,
                payload: Some(payload),
            });
        }
        drop(archive);

        write_packed(&handle.path, &packed, self.robustness)?;
        let replaced = self.staged.remove(&id).map_or(0, |staged| staged.len());
        info!(archive = %handle.relpath, replaced, "saved archive");
        Ok(())
    }
}

/// A container entry on its way into a rewritten archive.
struct PackedEntry {
    name: String,
    method: CompressionMethod,
    /// `None` marks a directory entry
    payload: Option<Vec<u8>>,
}

/// Create (or replace) a pak archive and its sidecar from scratch.
pub fn write_pak(
    path: &NormalizedPath,
    entries: &[(&str, &[u8])],
    robustness: RobustnessConfig,
) -> Result<()> {
    let packed: Vec<PackedEntry> = entries
        .iter()
        .map(|(name, payload)| PackedEntry {
            name: (*name).to_string(),
            method: CompressionMethod::Deflated,
            payload: Some(payload.to_vec()),
        })
        .collect();
    write_packed(path, &packed, robustness)
}

/// Encode entries into a zip and write it plus its sidecar atomically.
fn write_packed(
    path: &NormalizedPath,
    packed: &[PackedEntry],
    robustness: RobustnessConfig,
) -> Result<()> {
    let native = path.to_native();
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut described = Vec::new();

    for entry in packed {
        let method = match entry.method {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        let options = SimpleFileOptions::default().compression_method(method);
        match &entry.payload {
            None => writer
                .add_directory(entry.name.as_str(), options)
                .map_err(|e| Error::zip(&native, e))?,
            Some(payload) => {
                writer
                    .start_file(entry.name.as_str(), options)
                    .map_err(|e| Error::zip(&native, e))?;
                writer
                    .write_all(payload)
                    .map_err(|e| hudfix_fs::Error::io(&native, e))?;
                described.push(SidecarEntry::describe(entry.name.as_str(), payload));
            }
        }
    }

    let bytes = writer
        .finish()
        .map_err(|e| Error::zip(&native, e))?
        .into_inner();

    let sidecar_path = NormalizedPath::new(format!(
        "{}.{}",
        path.as_str(),
        hudfix_fs::HudPath::SidecarExtension.as_str()
    ));
    let sidecar = SidecarManifest::new(described).to_bytes(&sidecar_path)?;

    io::write_atomic(path, &bytes, robustness)?;
    io::write_atomic(&sidecar_path, &sidecar, robustness)?;
    Ok(())
}

fn open_zip(path: &Path) -> Result<ZipArchive<fs::File>> {
    let file = fs::File::open(path).map_err(|e| hudfix_fs::Error::io(path, e))?;
    ZipArchive::new(file).map_err(|e| Error::zip(path, e))
}

fn list_entries(path: &NormalizedPath) -> Result<Vec<String>> {
    let native = path.to_native();
    let mut archive = open_zip(&native)?;
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let file = archive
            .by_index(index)
            .map_err(|e| Error::zip(&native, e))?;
        if !file.is_dir() {
            names.push(file.name().to_string());
        }
    }
    Ok(names)
}

fn is_pak(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'));
    !hidden
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PAK_EXTENSION))
}

fn find_archives(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                stack.push(path);
            } else if is_pak(&path) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}
