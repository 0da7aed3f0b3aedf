#![allow(dead_code)]

use chrono::NaiveDate;
use photosift_lib::{FileStat, FsMetadata, MetadataProvider, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A scratch `source/` and `target/` pair.
pub struct TestTrees {
    _temp_dir: TempDir,
    pub source: PathBuf,
    pub target: PathBuf,
}

impl TestTrees {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("source");
        let target = temp_dir.path().join("target");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&target).unwrap();
        Self {
            _temp_dir: temp_dir,
            source,
            target,
        }
    }
}

/// Writes `len` bytes of `fill` to `path` and sets its mtime to `mtime_secs`.
pub fn write_file(path: &Path, len: usize, fill: u8, mtime_secs: u64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, vec![fill; len]).unwrap();
    set_mtime(path, mtime_secs);
}

pub fn set_mtime(path: &Path, secs: u64) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

pub fn mtime_secs(path: &Path) -> u64 {
    fs::metadata(path)
        .unwrap()
        .modified()
        .unwrap()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Writes a minimal TIFF whose EXIF `DateTimeOriginal` is `datetime`
/// ("YYYY:MM:DD HH:MM:SS").
pub fn write_dated_tiff(path: &Path, datetime: &str, mtime_secs: u64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let field = exif::Field {
        tag: exif::Tag::DateTimeOriginal,
        ifd_num: exif::In::PRIMARY,
        value: exif::Value::Ascii(vec![datetime.as_bytes().to_vec()]),
    };
    let mut writer = exif::experimental::Writer::new();
    writer.push_field(&field);
    let mut buf = std::io::Cursor::new(Vec::new());
    writer.write(&mut buf, false).unwrap();
    fs::write(path, buf.into_inner()).unwrap();
    set_mtime(path, mtime_secs);
}

/// Every file under `root` with its contents, for before/after comparisons.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let contents = fs::read(e.path()).unwrap();
            (e.path().strip_prefix(root).unwrap().to_path_buf(), contents)
        })
        .collect()
}

/// Real `stat`, capture dates from a table.
#[derive(Default)]
pub struct DatedMetadata {
    dates: HashMap<PathBuf, NaiveDate>,
}

impl DatedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, path: &Path, y: i32, m: u32, d: u32) -> Self {
        self.dates
            .insert(path.to_path_buf(), NaiveDate::from_ymd_opt(y, m, d).unwrap());
        self
    }
}

impl MetadataProvider for DatedMetadata {
    fn stat(&self, path: &Path) -> Result<FileStat> {
        FsMetadata.stat(path)
    }

    fn capture_date(&self, path: &Path) -> Option<NaiveDate> {
        self.dates.get(path).copied()
    }
}

/// Real `stat`, but deletes the listed files right after stat'ing them, so
/// a later removal of the same path fails.
pub struct VanishingMetadata {
    doomed: Mutex<HashSet<PathBuf>>,
}

impl VanishingMetadata {
    pub fn new(doomed: &[&Path]) -> Self {
        Self {
            doomed: Mutex::new(doomed.iter().map(|p| p.to_path_buf()).collect()),
        }
    }
}

impl MetadataProvider for VanishingMetadata {
    fn stat(&self, path: &Path) -> Result<FileStat> {
        let stat = FsMetadata.stat(path)?;
        if self.doomed.lock().unwrap().remove(path) {
            fs::remove_file(path).unwrap();
        }
        Ok(stat)
    }

    fn capture_date(&self, _path: &Path) -> Option<NaiveDate> {
        None
    }
}
