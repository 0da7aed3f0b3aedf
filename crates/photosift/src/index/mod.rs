pub mod key;
pub mod library;
pub mod metadata;
pub mod record;
pub mod walker;

pub use key::{IdentityKey, KeyStrategy};
pub use library::{IdentityIndex, IndexEntry, IndexStats};
pub use metadata::{read_capture_date, FileStat, FsMetadata, MetadataProvider};
pub use record::FileRecord;
pub use walker::{TreeWalker, WalkOptions};
