//! Snapshot service
//!
//! Entry point for every snapshot operation on a named target. The service
//! owns the target registry, the engine settings, the clock used to name new
//! snapshots and the two operation locks; share one instance (e.g. behind an
//! `Arc`) between every worker that can trigger destructive operations.

use std::path::PathBuf;
use std::thread;

use tracing::{debug, info};

use super::archive::archive;
use super::catalog::{list_snapshots, snapshot_infos, SnapshotInfo};
use super::locks::OperationLocks;
use super::name::{Clock, SnapshotName, SystemClock};
use super::restore::{RestoreOutcome, Restorer};
use super::retention;
use crate::config::paths::SavePaths;
use crate::config::settings::Settings;
use crate::error::{SaveError, SaveResult};
use crate::storage::targets::TargetRepository;

/// Creates, lists, restores and deletes snapshots
pub struct SnapshotService {
    targets: TargetRepository,
    settings: Settings,
    restorer: Restorer,
    locks: OperationLocks,
    clock: Box<dyn Clock>,
}

impl SnapshotService {
    /// Create a new SnapshotService
    pub fn new(paths: SavePaths, settings: Settings) -> Self {
        Self {
            targets: TargetRepository::new(paths),
            restorer: Restorer::from_settings(&settings),
            settings,
            locks: OperationLocks::new(),
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used to name new snapshots
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Get the target registry
    pub fn targets(&self) -> &TargetRepository {
        &self.targets
    }

    /// Get the engine settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Snapshot the live directory of a target
    ///
    /// Returns the path to the created package. If a package for the current
    /// second already exists, waits and tries the next second, up to
    /// `timestamp_attempts` times.
    pub fn backup(&self, target: &str) -> SaveResult<PathBuf> {
        let config = self.targets.read_config(target)?;
        let dir = self.targets.resolve(target)?;

        for attempt in 0..self.settings.timestamp_attempts {
            if attempt > 0 {
                thread::sleep(self.settings.retry_interval());
            }

            let name = SnapshotName::from_datetime(self.clock.now());
            let destination = dir.join(name.as_str());
            match archive(&config.src, &destination) {
                Ok(()) => {
                    info!(target_name = target, snapshot = %name, "created snapshot");
                    return Ok(destination);
                }
                Err(e) if e.is_conflict() => {
                    debug!("{} already exists, retrying", destination.display());
                }
                Err(e) => return Err(e),
            }
        }

        Err(SaveError::Conflict("failed to find a timestamp".into()))
    }

    /// List the snapshot names of a target, newest first
    pub fn list(&self, target: &str) -> SaveResult<Vec<String>> {
        list_snapshots(&self.targets.resolve(target)?)
    }

    /// List the snapshots of a target with metadata, newest first
    pub fn list_detailed(&self, target: &str) -> SaveResult<Vec<SnapshotInfo>> {
        snapshot_infos(&self.targets.resolve(target)?)
    }

    /// Get the most recent snapshot of a target
    pub fn latest(&self, target: &str) -> SaveResult<Option<SnapshotInfo>> {
        Ok(self.list_detailed(target)?.into_iter().next())
    }

    /// Restore a snapshot over the target's live directory
    pub fn recover(&self, target: &str, snapshot: &str) -> SaveResult<RestoreOutcome> {
        SnapshotName::parse(snapshot)?;
        let dir = self.targets.resolve(target)?;
        let config = self.targets.read_config(target)?;

        let _guard = self.locks.restore();
        let outcome = self.restorer.restore(&dir.join(snapshot), &config.src)?;
        info!(
            target_name = target,
            snapshot,
            entries = outcome.entries_restored,
            "restored snapshot"
        );
        Ok(outcome)
    }

    /// Delete every snapshot of a target except the newest
    pub fn delete_all_but_newest(&self, target: &str) -> SaveResult<Vec<PathBuf>> {
        let dir = self.targets.resolve(target)?;

        let guard = self.locks.delete();
        retention::delete_all_but_newest(&guard, &dir)
    }

    /// Delete one snapshot of a target
    pub fn delete_one(&self, target: &str, snapshot: &str) -> SaveResult<PathBuf> {
        let dir = self.targets.resolve(target)?;

        let guard = self.locks.delete();
        retention::delete_one(&guard, &dir, snapshot)
    }
}
