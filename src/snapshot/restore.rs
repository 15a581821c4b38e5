//! Snapshot restoration
//!
//! Replaces a live directory with the contents of a snapshot package.
//!
//! The default sequence mirrors the long-standing behaviour:
//!
//! 1. If the chosen snapshot file is missing, archive the live directory to
//!    `<live>.bkup.zip` first (refusing to overwrite an older one).
//! 2. Remove the live directory.
//! 3. Extract every entry of the package.
//! 4. On success, delete the defensive backup taken in step 1.
//!
//! This is not atomic: a failure in step 3 leaves the live directory
//! partially populated. `staged_restore` extracts into a sibling staging
//! directory instead. Once extraction succeeded the live directory is moved
//! aside, the staging directory renamed into place, and the old tree removed;
//! a failed rename moves the old tree back.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use super::archive::archive;
use crate::config::settings::{DefensiveBackup, Settings};
use crate::error::{SaveError, SaveResult};

/// Suffix appended to the live path for the defensive backup
pub const DEFENSIVE_BACKUP_SUFFIX: &str = ".bkup.zip";

/// Restores snapshot packages over live directories
#[derive(Debug, Clone, Copy, Default)]
pub struct Restorer {
    defensive_backup: DefensiveBackup,
    staged: bool,
}

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreOutcome {
    /// Number of package entries written
    pub entries_restored: usize,
    /// Whether a defensive backup was taken before replacing the live directory
    pub took_defensive_backup: bool,
    /// Defensive backup that could not be removed afterwards
    pub leftover_backup: Option<PathBuf>,
    /// Whether the staging-then-rename path was used
    pub staged: bool,
}

impl RestoreOutcome {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let mut summary = format!("Restored {} entries", self.entries_restored);
        if self.staged {
            summary.push_str(" (staged)");
        }
        if let Some(path) = &self.leftover_backup {
            summary.push_str(&format!("; please remove {}", path.display()));
        }
        summary
    }
}

impl Restorer {
    /// Create a new Restorer
    pub fn new(defensive_backup: DefensiveBackup, staged: bool) -> Self {
        Self {
            defensive_backup,
            staged,
        }
    }

    /// Create a Restorer configured from engine settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.defensive_backup, settings.staged_restore)
    }

    /// Make `tgt` contain exactly the contents of the package at `src`
    pub fn restore(&self, src: &Path, tgt: &Path) -> SaveResult<RestoreOutcome> {
        info!("~ {} <- {}", tgt.display(), src.display());

        let backup = self.take_defensive_backup(src, tgt)?;

        let entries_restored = if self.staged {
            replace_staged(src, tgt)?
        } else {
            replace_in_place(src, tgt)?
        };

        let mut outcome = RestoreOutcome {
            entries_restored,
            took_defensive_backup: backup.is_some(),
            leftover_backup: None,
            staged: self.staged,
        };

        if let Some(path) = backup {
            if let Err(e) = fs::remove_file(&path) {
                warn!("unable to cleanup {}: {}", path.display(), e);
                outcome.leftover_backup = Some(path);
            }
        }

        Ok(outcome)
    }

    fn take_defensive_backup(&self, src: &Path, tgt: &Path) -> SaveResult<Option<PathBuf>> {
        let needed = match self.defensive_backup {
            DefensiveBackup::WhenSnapshotMissing => !src.exists(),
            DefensiveBackup::Always => tgt.exists(),
        };
        if !needed {
            return Ok(None);
        }

        let path = defensive_backup_path(tgt);
        match fs::symlink_metadata(&path) {
            Ok(_) => {
                return Err(SaveError::Conflict(format!(
                    "stale defensive backup present, please remove {}",
                    path.display()
                )))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        archive(tgt, &path).map_err(|e| {
            warn!("unable to backup for recover: {}", e);
            e
        })?;

        Ok(Some(path))
    }
}

/// Path of the defensive backup for a live directory (`<tgt>.bkup.zip`)
pub fn defensive_backup_path(tgt: &Path) -> PathBuf {
    let mut path = OsString::from(tgt.as_os_str());
    path.push(DEFENSIVE_BACKUP_SUFFIX);
    PathBuf::from(path)
}

fn replace_in_place(src: &Path, tgt: &Path) -> SaveResult<usize> {
    remove_live(tgt)?;
    extract(src, tgt)
}

fn replace_staged(src: &Path, tgt: &Path) -> SaveResult<usize> {
    let staging = sibling_path(tgt, ".restore-staging")?;
    let retired = sibling_path(tgt, ".restore-old")?;

    for leftover in [&staging, &retired] {
        if fs::symlink_metadata(leftover).is_ok() {
            return Err(SaveError::Conflict(format!(
                "leftover from an earlier restore present, please remove {}",
                leftover.display()
            )));
        }
    }

    let entries = match extract(src, &staging) {
        Ok(_) if !staging.is_dir() => {
            discard(&staging);
            return Err(SaveError::Validation(format!(
                "{} holds no directory to restore",
                src.display()
            )));
        }
        Ok(entries) => entries,
        Err(e) => {
            discard(&staging);
            return Err(e);
        }
    };

    // Live tree goes aside until the staging directory is in place.
    let had_live = match fs::rename(tgt, &retired) {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            discard(&staging);
            return Err(SaveError::Io(format!(
                "Failed to move {} aside: {}",
                tgt.display(),
                e
            )));
        }
    };

    if let Err(e) = fs::rename(&staging, tgt) {
        if had_live {
            if let Err(back) = fs::rename(&retired, tgt) {
                warn!(
                    "unable to put {} back, it is kept at {}: {}",
                    tgt.display(),
                    retired.display(),
                    back
                );
            }
        }
        discard(&staging);
        return Err(SaveError::Io(format!(
            "Failed to move {} into place: {}",
            staging.display(),
            e
        )));
    }

    if had_live {
        discard(&retired);
    }

    Ok(entries)
}

/// Hidden sibling of `tgt` named `.<name><suffix>`
fn sibling_path(tgt: &Path, suffix: &str) -> SaveResult<PathBuf> {
    let name = tgt
        .file_name()
        .ok_or_else(|| SaveError::Validation(format!("cannot restore onto {}", tgt.display())))?;
    let mut sibling = OsString::from(".");
    sibling.push(name);
    sibling.push(suffix);
    Ok(tgt.with_file_name(sibling))
}

/// Best-effort removal of a scratch path
fn discard(path: &Path) {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(_) => return,
    };
    if let Err(e) = result {
        warn!("unable to cleanup {}: {}", path.display(), e);
    }
}

fn remove_live(tgt: &Path) -> SaveResult<()> {
    match fs::remove_dir_all(tgt) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => {
            warn!("unable to remove target: {}", e);
            Err(SaveError::Io(format!(
                "Failed to remove {}: {}",
                tgt.display(),
                e
            )))
        }
    }
}

/// Extract a package so that its top-level directory becomes `dest`
fn extract(src: &Path, dest: &Path) -> SaveResult<usize> {
    let file = File::open(src).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            SaveError::snapshot_not_found(src.display().to_string())
        } else {
            SaveError::Io(format!("Failed to open {}: {}", src.display(), e))
        }
    })?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;

    // Directory modes are applied last so read-only directories can be filled.
    let mut dir_modes = Vec::new();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let relative = entry.enclosed_name().ok_or_else(|| {
            SaveError::Validation(format!("unsafe entry name in package: {}", entry.name()))
        })?;
        let path = rebase(&relative, dest);
        let mode = entry.unix_mode().map(|mode| mode & 0o777);

        if entry.is_dir() {
            debug!("+ {} ...", path.display());
            fs::create_dir_all(&path).map_err(|e| {
                SaveError::Io(format!("Failed to create {}: {}", path.display(), e))
            })?;
            dir_modes.push((path, mode));
            continue;
        }

        debug!("< {} ...", path.display());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| SaveError::Io(format!("Failed to create {}: {}", path.display(), e)))?;
        io::copy(&mut entry, &mut out)
            .map_err(|e| SaveError::Io(format!("Failed to extract {}: {}", path.display(), e)))?;
        drop(out);
        apply_mode(&path, mode)?;
    }

    let entries = zip.len();
    for (path, mode) in dir_modes.iter().rev() {
        apply_mode(path, *mode)?;
    }

    Ok(entries)
}

/// Swap the first component of a package entry for `dest`
fn rebase(relative: &Path, dest: &Path) -> PathBuf {
    let mut components = relative.components();
    components.next();
    let rest = components.as_path();
    if rest.as_os_str().is_empty() {
        dest.to_path_buf()
    } else {
        dest.join(rest)
    }
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> SaveResult<()> {
    use std::os::unix::fs::PermissionsExt;

    if let Some(mode) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
            SaveError::Io(format!(
                "Failed to set permissions on {}: {}",
                path.display(),
                e
            ))
        })?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> SaveResult<()> {
    Ok(())
}
