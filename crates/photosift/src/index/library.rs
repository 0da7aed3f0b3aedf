use crate::error::Result;
use crate::events::EventSink;
use crate::index::key::{IdentityKey, KeyStrategy};
use crate::index::metadata::MetadataProvider;
use crate::index::record::FileRecord;
use crate::index::walker::TreeWalker;
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// What the index remembers for one key.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexEntry {
    /// Metadata mode: the last reference file enumerated with this key.
    File(FileRecord),
    /// Date mode: folders holding photos from that day, in first-seen order.
    Folders(Vec<PathBuf>),
}

impl IndexEntry {
    /// Reference locations for this entry, earliest-inserted first.
    pub fn locations(&self) -> Vec<&Path> {
        match self {
            IndexEntry::File(record) => vec![record.path.as_path()],
            IndexEntry::Folders(folders) => folders.iter().map(PathBuf::as_path).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub files_indexed: usize,
    pub files_unkeyed: usize,
    pub errors: usize,
}

/// Mapping from identity key to reference locations, built from one full
/// walk of the reference tree and read-only afterwards.
///
/// In metadata mode a later file with an already-seen key replaces the earlier
/// one. Which of two such files survives depends on the filesystem's
/// enumeration order and is deliberately left unspecified.
#[derive(Debug, Clone)]
pub struct IdentityIndex {
    strategy: KeyStrategy,
    entries: HashMap<IdentityKey, IndexEntry>,
    stats: IndexStats,
}

impl IdentityIndex {
    pub fn new(strategy: KeyStrategy) -> Self {
        Self {
            strategy,
            entries: HashMap::new(),
            stats: IndexStats::default(),
        }
    }

    /// Walks `root` and indexes every file that yields a key.
    ///
    /// Metadata read failures are reported to `sink` and the file is skipped.
    pub fn build(
        root: &Path,
        strategy: KeyStrategy,
        walker: &TreeWalker,
        metadata: &dyn MetadataProvider,
        sink: &dyn EventSink,
        progress: Option<&ProgressBar>,
    ) -> Result<Self> {
        let mut index = Self::new(strategy);

        for path in walker.walk(root) {
            if let Some(pb) = progress {
                pb.inc(1);
            }

            match FileRecord::load(&path, metadata, strategy.needs_capture_date()) {
                Ok(record) => index.insert(record),
                Err(e) => {
                    sink.warn(&format!("Failed to read metadata ({}), skipping", e), &[&path]);
                    index.stats.errors += 1;
                }
            }
        }

        log::info!(
            "Indexed {} files ({} keys) in {}",
            index.stats.files_indexed,
            index.entries.len(),
            root.display()
        );

        Ok(index)
    }

    pub fn insert(&mut self, record: FileRecord) {
        let key = match self.strategy.key_for(&record) {
            Some(key) => key,
            None => {
                self.stats.files_unkeyed += 1;
                return;
            }
        };
        self.stats.files_indexed += 1;

        match self.strategy {
            KeyStrategy::Metadata { .. } => {
                self.entries.insert(key, IndexEntry::File(record));
            }
            KeyStrategy::CaptureDate => {
                let folder = record.folder().to_path_buf();
                let entry = self
                    .entries
                    .entry(key)
                    .or_insert_with(|| IndexEntry::Folders(Vec::new()));
                if let IndexEntry::Folders(folders) = entry {
                    if !folders.contains(&folder) {
                        folders.push(folder);
                    }
                }
            }
        }
    }

    pub fn lookup(&self, key: &IdentityKey) -> Option<&IndexEntry> {
        self.entries.get(key)
    }

    pub fn strategy(&self) -> KeyStrategy {
        self.strategy
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
