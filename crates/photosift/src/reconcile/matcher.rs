use crate::events::EventSink;
use crate::index::{FileRecord, IdentityIndex, IndexEntry, KeyStrategy, MetadataProvider};
use crate::reconcile::policy::{decide_dedupe, decide_relocation, Action, MatchDecision};
use std::path::PathBuf;

/// Result of looking up one subject file.
#[derive(Debug, Clone, PartialEq)]
pub enum Scanned {
    /// No reference counterpart, or the file could not be keyed. Left untouched.
    Unmatched(PathBuf),
    Matched(MatchDecision),
}

/// Looks subject files up in a finished [`IdentityIndex`].
pub struct Matcher<'a> {
    index: &'a IdentityIndex,
    metadata: &'a dyn MetadataProvider,
    sink: &'a dyn EventSink,
}

impl<'a> Matcher<'a> {
    pub fn new(
        index: &'a IdentityIndex,
        metadata: &'a dyn MetadataProvider,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            index,
            metadata,
            sink,
        }
    }

    /// Lazily classifies `paths`, one item per candidate, in input order.
    pub fn stream<'s, I>(&'s self, paths: I) -> impl Iterator<Item = Scanned> + 's
    where
        I: Iterator<Item = PathBuf> + 's,
    {
        paths.map(move |path| self.classify(path))
    }

    pub fn classify(&self, path: PathBuf) -> Scanned {
        let strategy = self.index.strategy();
        let subject = match FileRecord::load(&path, self.metadata, strategy.needs_capture_date()) {
            Ok(record) => record,
            Err(e) => {
                self.sink
                    .warn(&format!("Failed to read metadata ({}), skipping", e), &[&path]);
                return Scanned::Unmatched(path);
            }
        };

        let key = match strategy.key_for(&subject) {
            Some(key) => key,
            None => {
                self.sink
                    .warn("Failed to obtain date taken, skipping", &[&subject.path]);
                return Scanned::Unmatched(path);
            }
        };

        let entry = match self.index.lookup(&key) {
            Some(entry) => entry,
            None => return Scanned::Unmatched(path),
        };

        let decision = match (entry, strategy) {
            (
                IndexEntry::File(reference),
                KeyStrategy::Metadata {
                    ignore_size,
                    ignore_mtime,
                },
            ) => {
                if reference.path == subject.path {
                    self.sink.warn(
                        "Source and target file are the same, skipping",
                        &[&subject.path],
                    );
                    MatchDecision {
                        reference: reference.path.clone(),
                        subject,
                        action: Action::Skip,
                    }
                } else {
                    self.sink
                        .info("Found dupe!", &[&reference.path, &subject.path]);
                    let action = decide_dedupe(reference, &subject, ignore_size, ignore_mtime);
                    MatchDecision {
                        reference: reference.path.clone(),
                        subject,
                        action,
                    }
                }
            }
            (IndexEntry::Folders(folders), _) => {
                let folder = match folders.first() {
                    Some(folder) => folder,
                    None => return Scanned::Unmatched(path),
                };
                if folders.len() > 1 {
                    self.sink.warn(
                        &format!(
                            "Photos from {} are in {} directories, picking the first folder",
                            key,
                            folders.len()
                        ),
                        &[folder],
                    );
                }

                let action = decide_relocation(folder, &subject);
                let already_there = subject.folder() == folder.as_path()
                    || matches!(&action, Action::RelocateSubject { destination } if *destination == subject.path);
                if already_there {
                    self.sink
                        .warn("File already sorted into matched folder, skipping", &[&subject.path]);
                    MatchDecision {
                        reference: folder.clone(),
                        subject,
                        action: Action::Skip,
                    }
                } else {
                    MatchDecision {
                        reference: folder.clone(),
                        subject,
                        action,
                    }
                }
            }
            (IndexEntry::File(_), KeyStrategy::CaptureDate) => return Scanned::Unmatched(path),
        };

        Scanned::Matched(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PhotosiftError, Result};
    use crate::events::{EventLevel, MemorySink};
    use crate::index::FileStat;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::collections::HashMap;
    use std::path::Path;

    /// Serves metadata from a table instead of the filesystem.
    struct TableMetadata {
        files: HashMap<PathBuf, (u64, i64, Option<NaiveDate>)>,
    }

    impl TableMetadata {
        fn new(entries: &[(&str, u64, i64, Option<NaiveDate>)]) -> Self {
            Self {
                files: entries
                    .iter()
                    .map(|(p, size, secs, day)| (PathBuf::from(p), (*size, *secs, *day)))
                    .collect(),
            }
        }
    }

    impl MetadataProvider for TableMetadata {
        fn stat(&self, path: &Path) -> Result<FileStat> {
            let (size, secs, _) = self
                .files
                .get(path)
                .ok_or_else(|| PhotosiftError::FileNotFound(path.to_path_buf()))?;
            Ok(FileStat {
                size: *size,
                modified_at: Utc.timestamp_opt(*secs, 0).unwrap(),
            })
        }

        fn capture_date(&self, path: &Path) -> Option<NaiveDate> {
            self.files.get(path).and_then(|(_, _, day)| *day)
        }
    }

    fn index_of(strategy: KeyStrategy, meta: &TableMetadata, paths: &[&str]) -> IdentityIndex {
        let mut index = IdentityIndex::new(strategy);
        for p in paths {
            index.insert(FileRecord::load(Path::new(p), meta, strategy.needs_capture_date()).unwrap());
        }
        index
    }

    const STRICT: KeyStrategy = KeyStrategy::Metadata {
        ignore_size: false,
        ignore_mtime: false,
    };

    #[test]
    fn test_unmatched_file_yields_no_decision() {
        let meta = TableMetadata::new(&[("/src/a.jpg", 1, 1, None), ("/dst/b.jpg", 1, 1, None)]);
        let index = index_of(STRICT, &meta, &["/src/a.jpg"]);
        let sink = MemorySink::new();
        let matcher = Matcher::new(&index, &meta, &sink);

        assert_eq!(
            matcher.classify(PathBuf::from("/dst/b.jpg")),
            Scanned::Unmatched(PathBuf::from("/dst/b.jpg"))
        );
    }

    #[test]
    fn test_self_match_is_skipped_with_warning() {
        let meta = TableMetadata::new(&[("/lib/a.jpg", 1, 1, None)]);
        let index = index_of(STRICT, &meta, &["/lib/a.jpg"]);
        let sink = MemorySink::new();
        let matcher = Matcher::new(&index, &meta, &sink);

        match matcher.classify(PathBuf::from("/lib/a.jpg")) {
            Scanned::Matched(decision) => assert_eq!(decision.action, Action::Skip),
            other => panic!("expected a skip decision, got {:?}", other),
        }
        assert_eq!(sink.count(EventLevel::Warn), 1);
    }

    #[test]
    fn test_missing_stat_is_unmatched_with_warning() {
        let meta = TableMetadata::new(&[("/src/a.jpg", 1, 1, None)]);
        let index = index_of(STRICT, &meta, &["/src/a.jpg"]);
        let sink = MemorySink::new();
        let matcher = Matcher::new(&index, &meta, &sink);

        assert!(matches!(
            matcher.classify(PathBuf::from("/dst/vanished.jpg")),
            Scanned::Unmatched(_)
        ));
        assert_eq!(sink.count(EventLevel::Warn), 1);
    }

    #[test]
    fn test_ambiguous_date_picks_earliest_folder() {
        let day = NaiveDate::from_ymd_opt(2018, 9, 19);
        let meta = TableMetadata::new(&[
            ("/src/Trip/a.jpg", 1, 1, day),
            ("/src/Misc/b.jpg", 1, 1, day),
            ("/dst/IMG_x.jpg", 1, 1, day),
        ]);
        let index = index_of(
            KeyStrategy::CaptureDate,
            &meta,
            &["/src/Trip/a.jpg", "/src/Misc/b.jpg"],
        );
        let sink = MemorySink::new();
        let matcher = Matcher::new(&index, &meta, &sink);

        match matcher.classify(PathBuf::from("/dst/IMG_x.jpg")) {
            Scanned::Matched(decision) => {
                assert_eq!(decision.reference, PathBuf::from("/src/Trip"));
                assert_eq!(
                    decision.action,
                    Action::RelocateSubject {
                        destination: PathBuf::from("/src/Trip/moved/IMG_x.jpg")
                    }
                );
            }
            other => panic!("expected a relocation, got {:?}", other),
        }
        assert_eq!(sink.count(EventLevel::Warn), 1);
    }

    #[test]
    fn test_undated_subject_is_unmatched_with_warning() {
        let day = NaiveDate::from_ymd_opt(2018, 9, 19);
        let meta = TableMetadata::new(&[("/src/Trip/a.jpg", 1, 1, day), ("/dst/raw.jpg", 1, 1, None)]);
        let index = index_of(KeyStrategy::CaptureDate, &meta, &["/src/Trip/a.jpg"]);
        let sink = MemorySink::new();
        let matcher = Matcher::new(&index, &meta, &sink);

        assert!(matches!(
            matcher.classify(PathBuf::from("/dst/raw.jpg")),
            Scanned::Unmatched(_)
        ));
        assert_eq!(sink.count(EventLevel::Warn), 1);
    }

    #[test]
    fn test_stream_is_lazy_and_ordered() {
        let meta = TableMetadata::new(&[
            ("/src/a.jpg", 1, 1, None),
            ("/dst/a.jpg", 1, 1, None),
            ("/dst/b.jpg", 1, 1, None),
        ]);
        let index = index_of(STRICT, &meta, &["/src/a.jpg"]);
        let sink = MemorySink::new();
        let matcher = Matcher::new(&index, &meta, &sink);

        let paths = vec![PathBuf::from("/dst/b.jpg"), PathBuf::from("/dst/a.jpg")];
        let mut stream = matcher.stream(paths.into_iter());
        assert!(matches!(stream.next(), Some(Scanned::Unmatched(_))));
        assert_eq!(sink.events().len(), 0);
        assert!(matches!(stream.next(), Some(Scanned::Matched(_))));
        assert!(stream.next().is_none());
    }
}
