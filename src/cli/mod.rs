//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the snapshot service.

pub mod snapshot;
pub mod target;

pub use snapshot::{handle_snapshot_command, SnapshotCommands};
pub use target::{handle_target_command, TargetCommands};
