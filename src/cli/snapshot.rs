//! Snapshot CLI commands
//!
//! Implements CLI commands for taking, listing, restoring and deleting
//! snapshots of a target.

use clap::Subcommand;

use crate::error::{SaveError, SaveResult};
use crate::snapshot::SnapshotService;

/// Snapshot subcommands
#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// Take a snapshot of a target's live directory
    Backup {
        /// Target name
        target: String,
    },

    /// List a target's snapshots, newest first
    List {
        /// Target name
        target: String,

        /// Show size and creation time
        #[arg(short = 'l', long)]
        detailed: bool,
    },

    /// Restore a snapshot over the target's live directory
    Restore {
        /// Target name
        target: String,

        /// Snapshot filename (use 'latest' for most recent)
        snapshot: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete one snapshot (the newest one is always kept)
    Delete {
        /// Target name
        target: String,

        /// Snapshot filename
        snapshot: String,
    },

    /// Delete every snapshot except the newest
    Prune {
        /// Target name
        target: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a snapshot command
pub fn handle_snapshot_command(service: &SnapshotService, cmd: SnapshotCommands) -> SaveResult<()> {
    match cmd {
        SnapshotCommands::Backup { target } => {
            let path = service.backup(&target)?;
            let filename = path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            println!("Snapshot created: {}", filename);
            println!("Location: {}", path.display());
        }

        SnapshotCommands::List { target, detailed } => {
            let snapshots = service.list_detailed(&target)?;

            if snapshots.is_empty() {
                println!("No snapshots found for '{}'.", target);
                println!("Create one with: savepoint backup {}", target);
                return Ok(());
            }

            for (i, snapshot) in snapshots.iter().enumerate() {
                let marker = if i == 0 { " [newest]" } else { "" };
                if detailed {
                    let age = chrono::Utc::now().signed_duration_since(snapshot.created_at);
                    println!(
                        "{}{}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        snapshot.filename,
                        marker,
                        snapshot.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(snapshot.size_bytes),
                        format_duration(age),
                    );
                } else {
                    println!("{}{}", snapshot.filename, marker);
                }
            }

            if detailed {
                println!("Total: {} snapshot(s)", snapshots.len());
            }
        }

        SnapshotCommands::Restore {
            target,
            snapshot,
            force,
        } => {
            let snapshot = resolve_snapshot(service, &target, &snapshot)?;
            let config = service.targets().read_config(&target)?;

            if !force {
                println!("Restore {} into {}", snapshot, config.src.display());
                println!("WARNING: This will replace ALL current contents of that directory!");
                println!("To proceed, run again with --force flag:");
                println!("  savepoint restore {} {} --force", target, snapshot);
                return Ok(());
            }

            let outcome = service.recover(&target, &snapshot)?;
            println!("Restore complete!");
            println!("{}", outcome.summary());
        }

        SnapshotCommands::Delete { target, snapshot } => {
            let path = service.delete_one(&target, &snapshot)?;
            println!("Deleted: {}", path.display());
        }

        SnapshotCommands::Prune { target, force } => {
            let snapshots = service.list(&target)?;

            if snapshots.len() <= 1 {
                return Err(SaveError::Retention("no save to be deleted".into()));
            }

            if !force {
                println!(
                    "{} snapshot(s) would be deleted; {} is kept.",
                    snapshots.len() - 1,
                    snapshots[0]
                );
                println!("To delete them, run again with --force flag:");
                println!("  savepoint prune {} --force", target);
                return Ok(());
            }

            let deleted = service.delete_all_but_newest(&target)?;
            println!("Deleted {} snapshot(s).", deleted.len());
        }
    }

    Ok(())
}

/// Resolve a snapshot argument, handling the "latest" keyword
fn resolve_snapshot(service: &SnapshotService, target: &str, snapshot: &str) -> SaveResult<String> {
    if snapshot.eq_ignore_ascii_case("latest") {
        return service
            .latest(target)?
            .map(|info| info.filename)
            .ok_or_else(|| SaveError::snapshot_not_found("latest"));
    }

    Ok(snapshot.to_string())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    format!("{}d", hours / 24)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
