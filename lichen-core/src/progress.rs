//! Refresh progress reporting
//!
//! The refresh announces four checkpoints through an explicit reporter
//! passed by the caller. Verbosity travels with the reporter instead of
//! living in process-global state, so two refreshes in one process can
//! report at different levels.

use std::path::Path;

use tracing::{debug, info};

/// Output level requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Suppress everything below errors
    Quiet,

    /// Keep checkpoint chatter at debug level
    #[default]
    Normal,

    /// Emit checkpoints as info events
    Verbose,
}

impl Verbosity {
    /// Map the conventional `--quiet` / `--verbose` flag pair
    ///
    /// Both flags are accepted together; quiet wins because suppressing
    /// output is the stronger request.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Checkpoint notifications from a refresh
///
/// Every method has an empty default body, so implementors override only
/// the checkpoints they observe.
pub trait Progress: Send + Sync {
    /// The remote index arrived
    fn index_fetched(&self, _bytes: usize) {}

    /// The raw index was staged
    fn index_written(&self, _path: &Path) {}

    /// Every license template was materialized into staging
    fn templates_written(&self, _licenses: usize) {}

    /// The staged data replaced the cache
    fn committed(&self, _path: &Path) {}
}

/// Discards every checkpoint
pub struct NullProgress;

impl Progress for NullProgress {}

/// Emits checkpoints through `tracing`, honoring the requested verbosity
pub struct LogProgress {
    verbosity: Verbosity,
}

impl LogProgress {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn emit(&self, message: &str) {
        match self.verbosity {
            Verbosity::Quiet => {}
            Verbosity::Normal => debug!("{message}"),
            Verbosity::Verbose => info!("{message}"),
        }
    }
}

impl Progress for LogProgress {
    fn index_fetched(&self, bytes: usize) {
        self.emit(&format!("Fetched license index ({bytes} bytes)"));
    }

    fn index_written(&self, path: &Path) {
        self.emit(&format!("Staged license index at {}", path.display()));
    }

    fn templates_written(&self, licenses: usize) {
        self.emit(&format!("Materialized {licenses} license templates"));
    }

    fn committed(&self, path: &Path) {
        self.emit(&format!("Committed refreshed cache to {}", path.display()));
    }
}
