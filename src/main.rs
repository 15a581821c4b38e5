use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use savepoint::cli::{
    handle_snapshot_command, handle_target_command, SnapshotCommands, TargetCommands,
};
use savepoint::config::{SavePaths, Settings};
use savepoint::snapshot::SnapshotService;

#[derive(Parser)]
#[command(
    name = "savepoint",
    version,
    about = "Timestamped directory snapshots with safe restore",
    long_about = "savepoint keeps full, timestamp-named zip snapshots of a directory \
                  and restores any of them back over the live directory. The newest \
                  snapshot of a target is never deleted."
)]
struct Cli {
    /// Storage root holding one directory per target
    #[arg(long, env = "SAVEPOINT_ROOT", global = true)]
    root: Option<PathBuf>,

    /// Also log one progress line per archived or extracted path
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Target management commands
    #[command(subcommand)]
    Target(TargetCommands),

    #[command(flatten)]
    Snapshot(SnapshotCommands),

    /// Show the storage root and engine settings
    Config {
        /// Write a settings.json with the current values
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    savepoint::logging::init_logging(cli.verbose);

    let paths = match cli.root {
        Some(root) => SavePaths::with_root(root),
        None => SavePaths::new()?,
    };
    let settings = Settings::load_or_default(&paths)?;

    match cli.command {
        Some(Commands::Target(cmd)) => {
            let service = SnapshotService::new(paths, settings);
            handle_target_command(&service, cmd)?;
        }
        Some(Commands::Snapshot(cmd)) => {
            let service = SnapshotService::new(paths, settings);
            handle_snapshot_command(&service, cmd)?;
        }
        Some(Commands::Config { init }) => {
            if init {
                settings.save(&paths)?;
                println!("Wrote {}", paths.settings_file().display());
                println!();
            }
            println!("savepoint Configuration");
            println!("=======================");
            println!("Storage root:  {}", paths.root().display());
            println!("Settings file: {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Timestamp attempts: {}", settings.timestamp_attempts);
            println!("  Retry interval:     {} ms", settings.retry_interval_ms);
            println!("  Defensive backup:   {:?}", settings.defensive_backup);
            println!("  Staged restore:     {}", settings.staged_restore);
        }
        None => {
            println!("savepoint - timestamped directory snapshots");
            println!();
            println!("Run 'savepoint --help' for usage information.");
            println!("Run 'savepoint target add <name> <path>' to get started.");
        }
    }

    Ok(())
}
