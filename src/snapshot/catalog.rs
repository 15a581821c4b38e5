//! Snapshot listing
//!
//! A target's snapshot set is every regular file in its storage directory
//! whose name parses as a snapshot name, newest first.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::name::SnapshotName;
use crate::error::{SaveError, SaveResult};

/// Metadata about a snapshot
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    /// Snapshot filename
    pub filename: String,
    /// Full path to the package
    pub path: PathBuf,
    /// When the snapshot was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// List the snapshot names in `dir`, newest first
pub fn list_snapshots(dir: &Path) -> SaveResult<Vec<String>> {
    Ok(scan(dir)?
        .into_iter()
        .map(|name| name.as_str().to_string())
        .collect())
}

/// List the snapshots in `dir` with file metadata, newest first
pub fn snapshot_infos(dir: &Path) -> SaveResult<Vec<SnapshotInfo>> {
    scan(dir)?
        .into_iter()
        .map(|name| {
            let path = dir.join(name.as_str());
            let metadata = fs::metadata(&path)
                .map_err(|e| SaveError::Io(format!("Failed to stat {}: {}", path.display(), e)))?;
            Ok(SnapshotInfo {
                filename: name.as_str().to_string(),
                created_at: name.created_at(),
                size_bytes: metadata.len(),
                path,
            })
        })
        .collect()
}

fn scan(dir: &Path) -> SaveResult<Vec<SnapshotName>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            SaveError::path_not_found(dir.display().to_string())
        } else {
            SaveError::Io(format!("Failed to read {}: {}", dir.display(), e))
        }
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| SaveError::Io(format!("Failed to read directory entry: {}", e)))?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if let Ok(name) = SnapshotName::parse(&file_name) {
            names.push(name);
        }
    }

    // Sort by date, newest first
    names.sort_by(|a, b| b.cmp(a));
    Ok(names)
}
