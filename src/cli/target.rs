//! Target CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::error::SaveResult;
use crate::snapshot::SnapshotService;

/// Target subcommands
#[derive(Subcommand)]
pub enum TargetCommands {
    /// Register a directory to snapshot under a target name
    Add {
        /// Target name (a single path component)
        name: String,

        /// Live directory to snapshot and restore into
        path: PathBuf,
    },

    /// List registered targets
    List,

    /// Show a target's live directory and snapshot count
    Show {
        /// Target name
        name: String,
    },
}

/// Handle a target command
pub fn handle_target_command(service: &SnapshotService, cmd: TargetCommands) -> SaveResult<()> {
    let targets = service.targets();

    match cmd {
        TargetCommands::Add { name, path } => {
            // Stored paths must not depend on the working directory.
            let path = std::fs::canonicalize(&path).unwrap_or(path);
            let dir = targets.register(&name, &path)?;
            println!("Registered '{}' -> {}", name, path.display());
            println!("Snapshots will be stored in {}", dir.display());
        }

        TargetCommands::List => {
            let names = targets.list()?;
            if names.is_empty() {
                println!("No targets registered.");
                println!("Register one with: savepoint target add <name> <path>");
                return Ok(());
            }
            for name in names {
                println!("{}", name);
            }
        }

        TargetCommands::Show { name } => {
            let config = targets.read_config(&name)?;
            let snapshots = service.list(&name)?;

            println!("Target: {}", name);
            println!("Source: {}", config.src.display());
            println!("Storage: {}", targets.resolve(&name)?.display());
            println!("Snapshots: {}", snapshots.len());
            if let Some(newest) = snapshots.first() {
                println!("Newest: {}", newest);
            }
        }
    }

    Ok(())
}
