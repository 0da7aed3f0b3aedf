use crate::error::Result;
use crate::index::metadata::MetadataProvider;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};

/// One enumerated file and the metadata its identity key is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
    /// Only populated when the active key strategy needs it
    pub capture_date: Option<NaiveDate>,
}

impl FileRecord {
    /// Stats `path`, reading the capture date only when `with_capture_date` is set.
    pub fn load(
        path: &Path,
        metadata: &dyn MetadataProvider,
        with_capture_date: bool,
    ) -> Result<Self> {
        let stat = metadata.stat(path)?;
        let capture_date = if with_capture_date {
            metadata.capture_date(path)
        } else {
            None
        };

        Ok(Self {
            path: path.to_path_buf(),
            size: stat.size,
            modified_at: stat.modified_at,
            capture_date,
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn folder(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}
