pub mod config;
pub mod error;
pub mod events;
pub mod index;
pub mod reconcile;
pub mod util;

pub use config::Config;
pub use error::{ExecutionError, PhotosiftError, Result, Severity, Step};
pub use events::{Event, EventLevel, EventSink, LogSink, MemorySink};
pub use index::{
    FileRecord, FileStat, FsMetadata, IdentityIndex, IdentityKey, IndexEntry, KeyStrategy,
    MetadataProvider, TreeWalker, WalkOptions,
};
pub use reconcile::{
    Action, Executor, MatchDecision, Matcher, Outcome, Reconciler, RunCounters, RunOptions,
    RunSummary, Scanned,
};
