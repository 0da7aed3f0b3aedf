//! Identity keys used to decide that two files "match".
//!
//! A key is an equality token derived from metadata, never from content: two
//! files with the same key are not guaranteed to be byte-identical.

use crate::index::record::FileRecord;
use chrono::NaiveDate;
use std::fmt;

/// How identity keys are derived for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Digest over base name, plus size and mtime unless ignored.
    Metadata { ignore_size: bool, ignore_mtime: bool },
    /// Capture date truncated to the day.
    CaptureDate,
}

impl KeyStrategy {
    pub fn needs_capture_date(&self) -> bool {
        matches!(self, KeyStrategy::CaptureDate)
    }

    /// Derives the key for `record`; `None` when the record cannot be keyed
    /// (a missing capture date in date mode).
    pub fn key_for(&self, record: &FileRecord) -> Option<IdentityKey> {
        match *self {
            KeyStrategy::Metadata {
                ignore_size,
                ignore_mtime,
            } => Some(IdentityKey::Digest(metadata_digest(
                record,
                ignore_size,
                ignore_mtime,
            ))),
            KeyStrategy::CaptureDate => record.capture_date.map(IdentityKey::Date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Digest([u8; 32]),
    Date(NaiveDate),
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Digest(bytes) => {
                for b in &bytes[..8] {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            IdentityKey::Date(date) => write!(f, "{}", date.format("%Y%m%d")),
        }
    }
}

// Fields are tagged and length-prefixed so no two field tuples share an encoding.
fn metadata_digest(record: &FileRecord, ignore_size: bool, ignore_mtime: bool) -> [u8; 32] {
    let name = record.file_name();
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"n");
    hasher.update(&(name.len() as u64).to_le_bytes());
    hasher.update(name.as_bytes());
    if !ignore_size {
        hasher.update(b"s");
        hasher.update(&record.size.to_le_bytes());
    }
    if !ignore_mtime {
        hasher.update(b"m");
        hasher.update(&record.modified_at.timestamp().to_le_bytes());
        hasher.update(&record.modified_at.timestamp_subsec_nanos().to_le_bytes());
    }
    *hasher.finalize().as_bytes()
}
