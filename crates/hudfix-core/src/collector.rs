//! Matching entries and the distinct archives that own them

use std::collections::BTreeSet;

use hudfix_archive::{ArchiveId, Collection, EntryHandle};
use tracing::debug;

/// Result of one search over a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    /// Every matching entry, in the order the collection returned them
    pub entries: Vec<EntryHandle>,
    /// Each archive owning at least one entry, exactly once
    pub archives: BTreeSet<ArchiveId>,
}

impl Targets {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose virtual path ends with `suffix`.
    pub fn with_suffix<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a EntryHandle> {
        self.entries.iter().filter(move |entry| entry.has_suffix(suffix))
    }
}

/// Searches a collection and groups the matches by archive.
pub struct ArchiveCollector;

impl ArchiveCollector {
    pub fn collect<C: Collection + ?Sized>(
        collection: &C,
        pattern: &str,
    ) -> hudfix_archive::Result<Targets> {
        let entries = collection.search(pattern)?;
        let archives: BTreeSet<ArchiveId> = entries.iter().map(|entry| entry.archive).collect();
        debug!(
            pattern,
            entries = entries.len(),
            archives = archives.len(),
            "collected search targets"
        );
        Ok(Targets { entries, archives })
    }
}
