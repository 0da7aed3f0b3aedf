//! File metadata needed to build identity keys.
//!
//! The engine only sees the [`MetadataProvider`] trait so tests can pin
//! capture dates without shipping real EXIF fixtures.

use crate::error::{PhotosiftError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Size and modification time of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

pub trait MetadataProvider {
    /// Returns size and mtime, failing with `FileNotFound` or an IO error.
    fn stat(&self, path: &Path) -> Result<FileStat>;

    /// Returns the day the photo was taken, or `None` when the embedded
    /// metadata is missing or unreadable.
    fn capture_date(&self, path: &Path) -> Option<NaiveDate>;
}

/// Reads metadata straight from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMetadata;

impl MetadataProvider for FsMetadata {
    fn stat(&self, path: &Path) -> Result<FileStat> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PhotosiftError::FileNotFound(path.to_path_buf()),
            _ => PhotosiftError::Io(e),
        })?;
        let modified = metadata.modified()?;

        Ok(FileStat {
            size: metadata.len(),
            modified_at: DateTime::<Utc>::from(modified),
        })
    }

    fn capture_date(&self, path: &Path) -> Option<NaiveDate> {
        match read_capture_date(path) {
            Ok(date) => date,
            Err(e) => {
                log::debug!("No capture date for {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Reads EXIF `DateTimeOriginal` and truncates it to a day.
pub fn read_capture_date<P: AsRef<Path>>(path: P) -> Result<Option<NaiveDate>> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|_| PhotosiftError::FileNotFound(path.to_path_buf()))?;
    let mut reader = BufReader::new(file);

    let exif = exif::Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| metadata_error(path, e))?;

    let field = match exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY) {
        Some(field) => field,
        None => return Ok(None),
    };

    let raw = match field.value {
        exif::Value::Ascii(ref values) => match values.first() {
            Some(raw) => raw,
            None => return Ok(None),
        },
        _ => return Ok(None),
    };

    let datetime = exif::DateTime::from_ascii(raw).map_err(|e| metadata_error(path, e))?;
    Ok(NaiveDate::from_ymd_opt(
        i32::from(datetime.year),
        u32::from(datetime.month),
        u32::from(datetime.day),
    ))
}

fn metadata_error(path: &Path, err: exif::Error) -> PhotosiftError {
    PhotosiftError::Metadata {
        path: PathBuf::from(path),
        message: err.to_string(),
    }
}
