//! [`TestCollection`] builder for archive collection scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use hudfix_archive::{Collection, PakCollection, write_pak};
use hudfix_fs::{NormalizedPath, RobustnessConfig};
use tempfile::TempDir;

/// Search pattern selecting the HUD layout directory
pub const PATTERN: &str = "DATA/Menu/HUD/Elements/";
pub const MINIMAP: &str = "DATA/Menu/HUD/Elements/Minimap.ini";
pub const TEXTURE: &str = "DATA/Menu/HUD/Elements/Minimap.dds";
pub const CHAT: &str = "DATA/Menu/HUD/Elements/Chat.ini";
/// Outside [`PATTERN`]
pub const SOUND: &str = "DATA/Sounds/click.wav";

pub const ARCHIVE_A: &str = "0.0.0.1/Archive_1.pak";
pub const ARCHIVE_B: &str = "0.0.0.2/Archive_2.pak";

/// A temporary directory holding a collection root (`game/`) and room for a
/// sibling backup root (`backup/`).
///
/// # Example
///
/// ```rust,no_run
/// use hudfix_test_utils::{PATTERN, TestCollection};
///
/// let game = TestCollection::scenario();
/// let before = game.files();
/// // ... process then revert ...
/// assert_eq!(game.files(), before);
/// ```
pub struct TestCollection {
    temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCollection {
    /// Create an empty collection root.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("game");
        fs::create_dir_all(&root).unwrap();
        Self { temp_dir, root }
    }

    /// Two archives:
    ///
    /// - `A` ([`ARCHIVE_A`]): [`MINIMAP`] and [`TEXTURE`], both under [`PATTERN`]
    /// - `B` ([`ARCHIVE_B`]): [`CHAT`] under [`PATTERN`], [`SOUND`] outside it
    pub fn scenario() -> Self {
        Self::new()
            .with_archive(
                ARCHIVE_A,
                &[
                    (MINIMAP, b"[Minimap]\r\nAnchorX=1.0\r\nXOffset=-200\r\n"),
                    (TEXTURE, b"DDS |\x00\x01\x02"),
                ],
            )
            .with_archive(
                ARCHIVE_B,
                &[
                    (CHAT, b"; chat box\n[Chat]\nAnchorX=0.0\nAnchorY=1.0\n"),
                    (SOUND, b"RIFF\x00\x00"),
                ],
            )
    }

    /// The collection root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A backup root next to, not inside, the collection root.
    pub fn backup_dir(&self) -> PathBuf {
        self.temp_dir.path().join("backup")
    }

    /// The temporary directory holding both roots.
    pub fn base(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a pak archive and its sidecar at `relpath`.
    pub fn add_archive(&self, relpath: &str, entries: &[(&str, &[u8])]) {
        write_pak(
            &NormalizedPath::new(self.root.join(relpath)),
            entries,
            RobustnessConfig::default(),
        )
        .unwrap_or_else(|e| panic!("TestCollection::add_archive({relpath}): {e}"));
    }

    /// Builder form of [`TestCollection::add_archive`].
    pub fn with_archive(self, relpath: &str, entries: &[(&str, &[u8])]) -> Self {
        self.add_archive(relpath, entries);
        self
    }

    /// Write a plain file under the collection root.
    pub fn write(&self, relpath: &str, content: &[u8]) {
        let path = self.root.join(relpath);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Read a file under the collection root.
    pub fn read(&self, relpath: &str) -> Vec<u8> {
        fs::read(self.root.join(relpath))
            .unwrap_or_else(|e| panic!("TestCollection::read({relpath}): {e}"))
    }

    /// Current payload of `entry` inside the archive at `archive_relpath`.
    pub fn read_entry(&self, archive_relpath: &str, entry: &str) -> Vec<u8> {
        let collection = PakCollection::open(&self.root).unwrap();
        let handle = collection
            .search(entry)
            .unwrap()
            .into_iter()
            .find(|e| {
                e.path == entry
                    && collection.archive(e.archive).unwrap().relpath == archive_relpath
            })
            .unwrap_or_else(|| panic!("no entry {entry} in {archive_relpath}"));
        collection.extract(&handle).unwrap()
    }

    /// Every file under the collection root keyed by forward-slash relpath.
    pub fn files(&self) -> BTreeMap<String, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect_files(&self.root, &self.root, &mut files);
        files
    }

    pub fn assert_file_exists(&self, relpath: &str) {
        assert!(
            self.root.join(relpath).is_file(),
            "expected file {relpath} under the collection root"
        );
    }
}

fn collect_files(base: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(base, &path, files);
        } else {
            let relpath = path
                .strip_prefix(base)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            files.insert(relpath, fs::read(&path).unwrap());
        }
    }
}
