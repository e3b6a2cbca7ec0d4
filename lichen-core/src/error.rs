//! Cache error types with clear, actionable messages

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::source::SourceError;

/// Errors produced by cache, staging, bootstrap and list operations
#[derive(Error, Debug)]
pub enum Error {
    /// The remote source could not deliver the index or a license detail
    #[error("Failed to fetch license data from the remote source")]
    Fetch(#[from] SourceError),

    /// The source delivered bytes that do not decode as license data.
    /// The offending payload is kept for diagnostics.
    #[error("Failed to decode license data from the remote source ({} bytes received)", payload.len())]
    Deserialize {
        payload: Vec<u8>,
        #[source]
        source: serde_json::Error,
    },

    /// No scratch directory could be allocated for staging
    #[error("Failed to create a staging directory for the refresh")]
    CreateTempDir(#[source] io::Error),

    /// A directory could not be created
    #[error("Failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file write failed
    #[error("Failed to write {path}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The existing cache could not be cleared for the new data
    #[error("Failed to remove the existing cache at {path}\n\nCheck the permissions on that directory and retry.")]
    RemovePath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Moving the staged data into the cache location failed
    #[error("Failed to move staged license data from {src} to {dst}")]
    CopyTree {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A refresh task ended without reporting an outcome
    #[error("The refresh reported {drained} of {expected} license outcomes\n\nThe existing cache was left untouched. Run the bootstrap again:\n  lichen bootstrap")]
    Incomplete { expected: usize, drained: usize },

    /// The local license index is missing or unreadable
    #[error("Failed to read the local license index at {path}\n\nTo build the local cache, run:\n  lichen bootstrap")]
    ReadIndex {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No cached template exists for the requested license
    #[error("No cached template for '{key}' at {path}\n\nTo see the cached licenses, run:\n  lichen list\n\nTo rebuild the local cache, run:\n  lichen bootstrap")]
    ReadTemplate {
        key: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The invoking user's home directory could not be resolved
    #[error("Could not locate the current user's home directory.\n\nSet LICHEN_DIR to choose a cache location explicitly.")]
    NoHomeDir,
}
