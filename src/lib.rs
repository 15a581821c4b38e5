//! savepoint - timestamped directory snapshots with safe restore
//!
//! This library keeps full, point-in-time snapshots of directory trees
//! ("targets") and restores any of them back over the live directory.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Storage root resolution and engine settings
//! - `error`: Custom error types
//! - `storage`: JSON helpers and the target registry
//! - `snapshot`: Archiving, restoring, listing and retention
//! - `cli`: Command handlers for the `savepoint` binary
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use savepoint::config::{SavePaths, Settings};
//! use savepoint::snapshot::SnapshotService;
//!
//! let paths = SavePaths::new()?;
//! let settings = Settings::load_or_default(&paths)?;
//! let service = SnapshotService::new(paths, settings);
//! service.targets().register("skyrim", "/home/me/Saves".as_ref())?;
//! service.backup("skyrim")?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod snapshot;
pub mod storage;

pub use error::{SaveError, SaveResult};
