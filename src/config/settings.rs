//! Engine settings for savepoint
//!
//! Tunes snapshot naming retries and how restores protect the live directory.
//! Every field has a default, so a missing or partial `settings.json` is fine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::SavePaths;
use crate::error::SaveError;
use crate::storage::file_io::{read_json, write_json_atomic};

/// When the restorer archives the live directory before replacing it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DefensiveBackup {
    /// Only when the chosen snapshot file is missing
    #[default]
    WhenSnapshotMissing,
    /// Before every restore whose live directory exists
    Always,
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// How many timestamps a backup tries before giving up
    #[serde(default = "default_timestamp_attempts")]
    pub timestamp_attempts: u32,

    /// Pause between timestamp attempts, in milliseconds
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Defensive backup trigger
    #[serde(default)]
    pub defensive_backup: DefensiveBackup,

    /// Extract into a staging directory and swap it in
    #[serde(default)]
    pub staged_restore: bool,
}

fn default_timestamp_attempts() -> u32 {
    3
}

fn default_retry_interval_ms() -> u64 {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timestamp_attempts: default_timestamp_attempts(),
            retry_interval_ms: default_retry_interval_ms(),
            defensive_backup: DefensiveBackup::default(),
            staged_restore: false,
        }
    }
}

impl Settings {
    /// Pause between timestamp attempts
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// Load settings from disk, falling back to defaults if the file doesn't exist
    pub fn load_or_default(paths: &SavePaths) -> Result<Self, SaveError> {
        read_json(paths.settings_file())
            .map_err(|e| SaveError::Config(format!("Failed to load settings: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SavePaths) -> Result<(), SaveError> {
        paths.ensure_root()?;
        write_json_atomic(paths.settings_file(), self)
    }
}
