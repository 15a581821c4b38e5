//! Snapshot engine for savepoint
//!
//! Keeps full, timestamp-named zip snapshots of a directory tree and restores
//! them over the live directory.
//!
//! # Architecture
//!
//! - `archive`: packs a directory into a new zip (exclusive create)
//! - `restore`: `Restorer`, replaces a live directory with a package
//! - `catalog`: lists a target's snapshots, newest first
//! - `retention`: refuses to delete the newest or the only snapshot
//! - `locks`: the delete and restore lock domains
//! - `manager`: `SnapshotService`, ties the above to named targets
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
//!
//! let snapshot = service.backup("skyrim")?;
//! let names = service.list("skyrim")?;
//! service.recover("skyrim", &names[0])?;
//! ```

mod archive;
mod catalog;
mod locks;
mod manager;
mod name;
mod restore;
mod retention;

pub use archive::{archive, entry_name};
pub use catalog::{list_snapshots, snapshot_infos, SnapshotInfo};
pub use locks::{DeleteGuard, OperationLocks, RestoreGuard};
pub use manager::SnapshotService;
pub use name::{Clock, SnapshotName, SystemClock};
pub use restore::{defensive_backup_path, RestoreOutcome, Restorer, DEFENSIVE_BACKUP_SUFFIX};
pub use retention::{delete_all_but_newest, delete_one};
