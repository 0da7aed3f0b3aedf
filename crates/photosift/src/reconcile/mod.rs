//! Matching pass: index the reference tree, stream the subject tree against
//! it, and apply one decision per matched file.

pub mod executor;
pub mod matcher;
pub mod policy;

pub use executor::{copy_preserving, Executor, Outcome};
pub use matcher::{Matcher, Scanned};
pub use policy::{decide_dedupe, decide_relocation, Action, MatchDecision, MOVED_DIR};

use crate::error::{ExecutionError, PhotosiftError, Result};
use crate::events::EventSink;
use crate::index::{IdentityIndex, KeyStrategy, MetadataProvider, TreeWalker};
use indicatif::ProgressBar;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub strategy: KeyStrategy,
    pub dry_run: bool,
    /// Stop after this many matches; 0 means unlimited
    pub limit: usize,
}

impl RunOptions {
    pub fn dedupe(ignore_size: bool, ignore_mtime: bool) -> Self {
        Self {
            strategy: KeyStrategy::Metadata {
                ignore_size,
                ignore_mtime,
            },
            dry_run: true,
            limit: 0,
        }
    }

    pub fn sort() -> Self {
        Self {
            strategy: KeyStrategy::CaptureDate,
            dry_run: true,
            limit: 0,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub candidates_seen: usize,
    /// Matches that produced an action (self matches excluded)
    pub matches: usize,
    /// Successful filesystem mutations; always 0 in a dry run
    pub actions_applied: usize,
    pub skipped: usize,
    /// Recoverable execution failures
    pub failed: usize,
}

#[derive(Debug)]
pub struct RunSummary {
    pub counters: RunCounters,
    pub indexed_files: usize,
    /// Set when the pass stopped on a fatal execution error
    pub fatal: Option<ExecutionError>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.fatal.is_none()
    }
}

pub struct Reconciler<'a> {
    walker: &'a TreeWalker,
    metadata: &'a dyn MetadataProvider,
    sink: &'a dyn EventSink,
    progress: Option<ProgressBar>,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        walker: &'a TreeWalker,
        metadata: &'a dyn MetadataProvider,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            walker,
            metadata,
            sink,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Builds the index of `reference_root`, then runs one pass over `subject_root`.
    pub fn run(
        &self,
        reference_root: &Path,
        subject_root: &Path,
        options: &RunOptions,
    ) -> Result<RunSummary> {
        for root in [reference_root, subject_root] {
            if !root.is_dir() {
                return Err(PhotosiftError::FileNotFound(root.to_path_buf()));
            }
        }

        log::info!("Indexing {}", reference_root.display());
        let index = IdentityIndex::build(
            reference_root,
            options.strategy,
            self.walker,
            self.metadata,
            self.sink,
            self.progress.as_ref(),
        )?;

        // The caller owns the message; only the count restarts per phase.
        if let Some(pb) = &self.progress {
            pb.set_position(0);
        }
        log::info!("Matching {}", subject_root.display());
        Ok(self.run_with_index(&index, subject_root, options))
    }

    /// Runs the matching pass against an already built index.
    ///
    /// Stops early when `options.limit` matches were handled or on the first
    /// fatal execution error; actions already applied stay applied.
    pub fn run_with_index(
        &self,
        index: &IdentityIndex,
        subject_root: &Path,
        options: &RunOptions,
    ) -> RunSummary {
        let matcher = Matcher::new(index, self.metadata, self.sink);
        let executor = Executor::new(options.dry_run, self.sink);
        let mut counters = RunCounters::default();
        let mut fatal = None;

        for scanned in matcher.stream(self.walker.walk(subject_root)) {
            counters.candidates_seen += 1;
            if let Some(pb) = &self.progress {
                pb.inc(1);
            }

            let decision = match scanned {
                Scanned::Unmatched(_) => continue,
                Scanned::Matched(decision) => decision,
            };

            if decision.action == Action::Skip {
                counters.skipped += 1;
                continue;
            }
            counters.matches += 1;

            match executor.apply(&decision) {
                Ok(Outcome::Applied) => counters.actions_applied += 1,
                Ok(Outcome::Previewed) | Ok(Outcome::Skipped) => {}
                Err(e) if e.is_fatal() => {
                    self.sink.error(
                        &format!("Failed to {} ({}), aborting", decision.action, e),
                        &[&decision.subject.path],
                    );
                    fatal = Some(e);
                    break;
                }
                Err(e) => {
                    self.sink.warn(
                        &format!("Failed to {} ({}), leaving file in place", decision.action, e),
                        &[&decision.subject.path],
                    );
                    counters.failed += 1;
                }
            }

            if options.limit > 0 && counters.matches >= options.limit {
                log::info!("Reached limit of {} matches, stopping", options.limit);
                break;
            }
        }

        RunSummary {
            counters,
            indexed_files: index.stats().files_indexed,
            fatal,
        }
    }
}
