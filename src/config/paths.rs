//! Path management for savepoint
//!
//! Resolves the storage root that holds one directory per target.
//!
//! ## Path Resolution Order
//!
//! 1. `SAVEPOINT_ROOT` environment variable (if set)
//! 2. Platform data directory (`~/.local/share/savepoint` on Linux,
//!    `~/Library/Application Support/savepoint` on macOS,
//!    `%APPDATA%\savepoint\data` on Windows)
//!
//! ## Layout
//!
//! ```text
//! root/
//!   settings.json            # optional engine settings
//!   <target>/
//!     config.json            # {"src": "/path/to/live/dir"}
//!     20240101120000.zip     # one file per snapshot
//! ```

use std::path::{Path, PathBuf};

use crate::error::SaveError;

/// Environment variable overriding the storage root
pub const ROOT_ENV_VAR: &str = "SAVEPOINT_ROOT";

/// Name of the per-target config record
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Manages all paths used by savepoint
#[derive(Debug, Clone)]
pub struct SavePaths {
    /// Storage root holding one directory per target
    root: PathBuf,
}

impl SavePaths {
    /// Create a new SavePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no platform data directory can be determined.
    pub fn new() -> Result<Self, SaveError> {
        let root = match std::env::var_os(ROOT_ENV_VAR) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_root()?,
        };

        Ok(Self { root })
    }

    /// Create SavePaths with a custom root (CLI `--root`, tests)
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the storage directory of a target (`root/<name>`)
    ///
    /// The name is not validated here; see `storage::targets`.
    pub fn target_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Get the path to a target's config record
    pub fn config_file(&self, name: &str) -> PathBuf {
        self.target_dir(name).join(CONFIG_FILE_NAME)
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    /// Ensure the storage root exists
    pub fn ensure_root(&self) -> Result<(), SaveError> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| SaveError::Io(format!("Failed to create storage root: {}", e)))
    }
}

fn resolve_default_root() -> Result<PathBuf, SaveError> {
    directories::ProjectDirs::from("", "", "savepoint")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SaveError::Config("Could not determine a data directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_root() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SavePaths::with_root(temp_dir.path().to_path_buf());

        assert_eq!(paths.root(), temp_dir.path());
        assert_eq!(paths.target_dir("game"), temp_dir.path().join("game"));
        assert_eq!(
            paths.config_file("game"),
            temp_dir.path().join("game").join("config.json")
        );
        assert_eq!(paths.settings_file(), temp_dir.path().join("settings.json"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var(ROOT_ENV_VAR, temp_dir.path());

        let paths = SavePaths::new().unwrap();
        assert_eq!(paths.root(), temp_dir.path());

        env::remove_var(ROOT_ENV_VAR);
    }

    #[test]
    fn test_ensure_root() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SavePaths::with_root(temp_dir.path().join("nested").join("root"));

        paths.ensure_root().unwrap();

        assert!(paths.root().is_dir());
    }
}
