//! Target registry
//!
//! A target is a directory directly under the storage root holding a
//! `config.json` record that points at the live directory being snapshotted.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::file_io::{read_json_required, write_json_new};
use crate::config::paths::SavePaths;
use crate::error::{SaveError, SaveResult};

/// Per-target config record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Live directory that backups read from and restores write to
    pub src: PathBuf,
}

/// Reads and registers targets under the storage root
#[derive(Debug, Clone)]
pub struct TargetRepository {
    paths: SavePaths,
}

impl TargetRepository {
    /// Create a new TargetRepository
    pub fn new(paths: SavePaths) -> Self {
        Self { paths }
    }

    /// Resolve a target name to its storage directory
    ///
    /// Fails if the name is unsafe or the directory does not exist.
    pub fn resolve(&self, name: &str) -> SaveResult<PathBuf> {
        let dir = self.checked_dir(name)?;
        if !dir.is_dir() {
            return Err(SaveError::target_not_found(name));
        }
        Ok(dir)
    }

    /// Read the config record of a target
    pub fn read_config(&self, name: &str) -> SaveResult<TargetConfig> {
        self.resolve(name)?;
        read_json_required(self.paths.config_file(name)).map_err(|e| {
            if e.is_not_found() {
                SaveError::Config(format!("Target '{}' has no config record", name))
            } else {
                e
            }
        })
    }

    /// Register a new target pointing at `src`
    ///
    /// The storage directory must not exist yet and `src` must be an
    /// existing directory.
    pub fn register(&self, name: &str, src: &Path) -> SaveResult<PathBuf> {
        let dir = self.checked_dir(name)?;

        if !src.exists() {
            return Err(SaveError::path_not_found(src.display().to_string()));
        }
        if !src.is_dir() {
            return Err(SaveError::Validation(format!(
                "{} is not a directory",
                src.display()
            )));
        }

        self.paths.ensure_root()?;
        fs::create_dir(&dir).map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                SaveError::Conflict(format!("Target '{}' already exists", name))
            } else {
                SaveError::Io(format!("Failed to create target directory: {}", e))
            }
        })?;

        let config = TargetConfig {
            src: src.to_path_buf(),
        };
        if let Err(e) = write_json_new(self.paths.config_file(name), &config) {
            if let Err(cleanup) = fs::remove_dir_all(&dir) {
                warn!("unable to cleanup {}: {}", dir.display(), cleanup);
            }
            return Err(e);
        }

        info!(name, src = %src.display(), "registered target");
        Ok(dir)
    }

    /// List registered targets (directories under the root), sorted by name
    pub fn list(&self) -> SaveResult<Vec<String>> {
        let entries = match fs::read_dir(self.paths.root()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SaveError::Io(format!(
                    "Failed to read storage root: {}",
                    e
                )))
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| SaveError::Io(format!("Failed to read directory entry: {}", e)))?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    fn checked_dir(&self, name: &str) -> SaveResult<PathBuf> {
        validate_target_name(name)?;
        let dir = self.paths.target_dir(name);
        if dir.parent() != Some(self.paths.root()) {
            return Err(SaveError::Validation(format!("bad name {}", name)));
        }
        Ok(dir)
    }
}

/// Check that a target name is a single plain path component
pub fn validate_target_name(name: &str) -> SaveResult<()> {
    if name.trim().is_empty() {
        return Err(SaveError::Validation("Target name cannot be empty".into()));
    }
    if name.contains(['/', '\\']) {
        return Err(SaveError::Validation(format!("bad name {}", name)));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(SaveError::Validation(format!("bad name {}", name))),
    }
}
