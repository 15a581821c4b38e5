//! Custom error types for savepoint
//!
//! This module defines the error hierarchy for the snapshot engine using
//! thiserror for ergonomic error definitions.

use thiserror::Error;

/// The main error type for savepoint operations
#[derive(Error, Debug)]
pub enum SaveError {
    /// Configuration-related errors (settings file, storage root)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Bad or unsafe input (target names, snapshot names, archive entries)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Something already occupies the path an operation needs
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Deleting the last or the newest snapshot
    #[error("Retention violation: {0}")]
    Retention(String),

    /// Archive format errors
    #[error("Archive error: {0}")]
    Archive(String),
}

impl SaveError {
    /// Create a "not found" error for targets
    pub fn target_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Target",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for snapshots
    pub fn snapshot_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Snapshot",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for filesystem paths
    pub fn path_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Path",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Check if this is a retention violation
    pub fn is_retention(&self) -> bool {
        matches!(self, Self::Retention(_))
    }
}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<zip::result::ZipError> for SaveError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Self::Io(e.to_string()),
            other => Self::Archive(other.to_string()),
        }
    }
}

/// Result type alias for savepoint operations
pub type SaveResult<T> = Result<T, SaveError>;
