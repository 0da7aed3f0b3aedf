//! Decides what to do with a subject file once it matched the reference tree.

use crate::index::FileRecord;
use std::fmt;
use std::path::{Path, PathBuf};

/// Subdirectory of a matched reference folder that receives relocated files.
pub const MOVED_DIR: &str = "moved";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the reference file with the (larger) subject, vacating the subject path.
    OverwriteReference,
    /// Move the (older) subject onto the reference path.
    MoveSubjectToReference,
    /// Remove the redundant subject copy; the reference is untouched.
    DeleteSubject,
    /// Move the subject into `destination`, under a matched reference folder.
    RelocateSubject { destination: PathBuf },
    /// Subject and reference are the same file.
    Skip,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::OverwriteReference => "overwrite-reference",
            Action::MoveSubjectToReference => "move-subject-to-reference",
            Action::DeleteSubject => "delete-subject",
            Action::RelocateSubject { .. } => "relocate-subject",
            Action::Skip => "skip",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A matched subject file and the action chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDecision {
    /// Reference file (dedupe) or reference folder (sort)
    pub reference: PathBuf,
    pub subject: FileRecord,
    pub action: Action,
}

/// Dedupe policy. First applicable rule wins:
///
/// 1. `ignore_size` and the subject is larger: overwrite the reference.
/// 2. `ignore_mtime` and the subject is older: move the subject onto the reference.
/// 3. Otherwise delete the subject.
///
/// Rule 1 outranks rule 2, so a subject that is both larger and older
/// overwrites the reference instead of being moved.
pub fn decide_dedupe(
    reference: &FileRecord,
    subject: &FileRecord,
    ignore_size: bool,
    ignore_mtime: bool,
) -> Action {
    if ignore_size {
        log::debug!(
            "size: reference {} = {}, subject {} = {}",
            reference.path.display(),
            reference.size,
            subject.path.display(),
            subject.size
        );
        if subject.size > reference.size {
            return Action::OverwriteReference;
        }
    }

    if ignore_mtime {
        log::debug!(
            "mtime: reference {} = {}, subject {} = {}",
            reference.path.display(),
            reference.modified_at.to_rfc3339(),
            subject.path.display(),
            subject.modified_at.to_rfc3339()
        );
        if subject.modified_at < reference.modified_at {
            return Action::MoveSubjectToReference;
        }
    }

    Action::DeleteSubject
}

/// Sort policy: always relocate into `<folder>/moved/<file name>`.
pub fn decide_relocation(folder: &Path, subject: &FileRecord) -> Action {
    Action::RelocateSubject {
        destination: folder.join(MOVED_DIR).join(subject.file_name()),
    }
}
