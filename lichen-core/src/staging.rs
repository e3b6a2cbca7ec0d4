//! Staging area for cache refreshes
//!
//! A refresh writes everything into an exclusively-owned scratch subtree
//! first; the real cache is only touched at commit time. The scratch root
//! deletes itself on drop, so the committed, aborted and early-error paths
//! all clean up the same way.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::cache::{DATA_DIR, INDEX_FILE, RAW_DIR, TEMPLATES_DIR};
use crate::error::Error;

/// Prefix for staging directories under the system temp dir
const STAGING_PREFIX: &str = "lichen";

/// An owned scratch subtree mirroring the cache layout
#[derive(Debug)]
pub struct StagingArea {
    root: TempDir,

    /// Staged data directory, moved over the real cache on commit
    pub data_dir: PathBuf,

    /// Staged raw detail documents
    pub raw_dir: PathBuf,

    /// Staged rendered templates
    pub templates_dir: PathBuf,

    /// Staged copy of the raw index
    pub index_file: PathBuf,
}

impl StagingArea {
    /// Allocate a fresh staging area with the full layout in place
    ///
    /// The returned directories exist and are empty. The area removes
    /// itself from disk when dropped.
    pub fn create() -> Result<Self, Error> {
        let root = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir()
            .map_err(Error::CreateTempDir)?;

        let data_dir = root.path().join(DATA_DIR);
        let raw_dir = data_dir.join(RAW_DIR);
        let templates_dir = data_dir.join(TEMPLATES_DIR);
        let index_file = data_dir.join(INDEX_FILE);

        for dir in [&raw_dir, &templates_dir] {
            std::fs::create_dir_all(dir).map_err(|err| Error::CreateDir {
                path: dir.clone(),
                source: err,
            })?;
        }

        Ok(Self {
            root,
            data_dir,
            raw_dir,
            templates_dir,
            index_file,
        })
    }

    /// The scratch root
    pub fn path(&self) -> &Path {
        self.root.path()
    }
}

#[cfg(test)]
mod staging_tests {
    use super::*;

    #[test]
    fn test_create_builds_the_full_layout() {
        let staging = StagingArea::create().unwrap();

        assert!(staging.raw_dir.is_dir());
        assert!(staging.templates_dir.is_dir());
        assert_eq!(staging.data_dir, staging.path().join("data"));
        assert_eq!(staging.index_file, staging.data_dir.join("index.json"));

        let entries = std::fs::read_dir(&staging.raw_dir).unwrap().count();
        assert_eq!(entries, 0);
    }

    #[test]
    fn test_roots_are_unique_per_refresh() {
        let first = StagingArea::create().unwrap();
        let second = StagingArea::create().unwrap();

        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn test_drop_removes_the_scratch_root() {
        let staging = StagingArea::create().unwrap();
        let root = staging.path().to_path_buf();
        assert!(root.exists());

        drop(staging);

        assert!(!root.exists());
    }
}
