//! Logging initialization
//!
//! Operation summaries (`~ src -> dst`, removals, registrations) are logged at
//! info level. Per-path progress lines (`>` archived, `+` directory created,
//! `<` file extracted) are debug level and only shown with `--verbose`.
//! `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;

/// Default filter directive for the given verbosity
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "savepoint=debug"
    } else {
        "savepoint=info"
    }
}

/// Initialize logging based on verbosity
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
