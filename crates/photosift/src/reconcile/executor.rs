use crate::error::{ExecutionError, Step};
use crate::events::EventSink;
use crate::reconcile::policy::{Action, MatchDecision};
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;

/// What happened to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The filesystem was changed.
    Applied,
    /// Dry run: the action was only described.
    Previewed,
    /// Nothing to do (self match).
    Skipped,
}

type RenameFn = fn(&Path, &Path) -> io::Result<()>;

pub struct Executor<'a> {
    dry_run: bool,
    sink: &'a dyn EventSink,
    rename: RenameFn,
}

impl<'a> Executor<'a> {
    pub fn new(dry_run: bool, sink: &'a dyn EventSink) -> Self {
        Self {
            dry_run,
            sink,
            rename: rename_file,
        }
    }

    /// Swaps the rename step, e.g. to simulate a cross-device move.
    #[cfg(test)]
    fn with_rename(mut self, rename: RenameFn) -> Self {
        self.rename = rename;
        self
    }

    pub fn apply(&self, decision: &MatchDecision) -> Result<Outcome, ExecutionError> {
        let subject = decision.subject.path.as_path();
        let reference = decision.reference.as_path();

        if decision.action == Action::Skip {
            log::debug!("Skipping {}", subject.display());
            return Ok(Outcome::Skipped);
        }

        if self.dry_run {
            let message = match &decision.action {
                Action::OverwriteReference => "Would overwrite reference with",
                Action::MoveSubjectToReference => "Would move onto reference",
                Action::DeleteSubject => "Would delete",
                Action::RelocateSubject { .. } => "Would move",
                Action::Skip => "Would skip",
            };
            match &decision.action {
                Action::RelocateSubject { destination } => {
                    self.sink.info(message, &[subject, destination])
                }
                Action::DeleteSubject => self.sink.info(message, &[subject]),
                _ => self.sink.info(message, &[subject, reference]),
            }
            return Ok(Outcome::Previewed);
        }

        match &decision.action {
            Action::DeleteSubject => self.remove(subject)?,
            Action::OverwriteReference | Action::MoveSubjectToReference => {
                self.replace(subject, reference)?
            }
            Action::RelocateSubject { destination } => self.relocate(subject, destination)?,
            Action::Skip => return Ok(Outcome::Skipped),
        }

        Ok(Outcome::Applied)
    }

    fn remove(&self, path: &Path) -> Result<(), ExecutionError> {
        fs::remove_file(path).map_err(|e| ExecutionError::fatal(Step::Remove, path, e))?;
        self.sink.info("Deleted", &[path]);
        Ok(())
    }

    /// Puts `subject` at `reference`: rename when possible, otherwise copy
    /// with timestamps then delete the subject. Fallback failures are fatal.
    fn replace(&self, subject: &Path, reference: &Path) -> Result<(), ExecutionError> {
        match (self.rename)(subject, reference) {
            Ok(()) => {
                self.sink.info("Moved", &[subject, reference]);
                Ok(())
            }
            Err(e) => {
                self.sink.warn(
                    &format!("Failed to rename ({}), copying instead", e),
                    &[subject, reference],
                );
                copy_preserving(subject, reference)
                    .map_err(|e| ExecutionError::fatal(Step::Copy, subject, e))?;
                self.sink.info("Copied", &[subject, reference]);
                self.remove(subject)
            }
        }
    }

    /// Moves `subject` to `destination`, creating the parent `moved` folder if
    /// needed. Never replaces an existing file at `destination`.
    fn relocate(&self, subject: &Path, destination: &Path) -> Result<(), ExecutionError> {
        if let Some(parent) = destination.parent() {
            match fs::create_dir(parent) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(ExecutionError::recoverable(Step::CreateDir, parent, e)),
            }
        }

        if destination.exists() {
            return Err(ExecutionError::recoverable(
                Step::Rename,
                destination,
                io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
            ));
        }

        match (self.rename)(subject, destination) {
            Ok(()) => {
                self.sink.info("Moved", &[subject, destination]);
                Ok(())
            }
            Err(e) => {
                self.sink.warn(
                    &format!("Failed to rename ({}), copying instead", e),
                    &[subject, destination],
                );
                if let Err(e) = copy_preserving(subject, destination) {
                    // Leave no partial copy behind; the subject stays where it was.
                    let _ = fs::remove_file(destination);
                    return Err(ExecutionError::recoverable(Step::Copy, subject, e));
                }
                self.sink.info("Copied", &[subject, destination]);
                self.remove(subject)
            }
        }
    }
}

/// Copies contents and permissions, then carries over access and modification times.
pub fn copy_preserving(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from)?;
    fs::copy(from, to)?;

    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    // The copy may be read-only; setting times only needs ownership.
    File::open(to)?.set_times(times)
}

fn rename_file(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}
