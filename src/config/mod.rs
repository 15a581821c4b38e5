//! Configuration module for savepoint
//!
//! This module provides configuration management including:
//! - Storage root resolution
//! - Engine settings persistence

pub mod paths;
pub mod settings;

pub use paths::SavePaths;
pub use settings::{DefensiveBackup, Settings};
