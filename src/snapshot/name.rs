//! Snapshot file names
//!
//! A snapshot is named by the UTC second it was created: `YYYYMMDDHHmmss.zip`.
//! The fixed width makes lexicographic order equal chronological order.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{SaveError, SaveResult};

const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const STAMP_LEN: usize = 14;
const EXTENSION: &str = ".zip";

/// A validated snapshot file name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotName {
    name: String,
    created_at: DateTime<Utc>,
}

impl SnapshotName {
    /// Name for a snapshot created at `instant` (sub-second part is dropped)
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        let name = format!("{}{}", instant.format(STAMP_FORMAT), EXTENSION);
        let created_at = parse_stamp(&name[..STAMP_LEN]).unwrap_or(instant);
        Self { name, created_at }
    }

    /// Strictly parse a file name; anything but 14 digits + `.zip` forming a
    /// real calendar instant is rejected
    pub fn parse(name: &str) -> SaveResult<Self> {
        let invalid = || SaveError::Validation(format!("not a snapshot name: {}", name));

        let stamp = name.strip_suffix(EXTENSION).ok_or_else(invalid)?;
        if stamp.len() != STAMP_LEN || !stamp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let created_at = parse_stamp(stamp).ok_or_else(invalid)?;

        Ok(Self {
            name: name.to_string(),
            created_at,
        })
    }

    /// The file name, including the extension
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// When the snapshot was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for SnapshotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn parse_stamp(stamp: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Source of the current time for naming new snapshots
pub trait Clock: Send + Sync {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
