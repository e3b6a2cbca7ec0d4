//! Local cache location and layout
//!
//! Everything lives under one root, `~/.lichen` by default:
//!
//! ```text
//! ~/.lichen/
//!   data/
//!     raw/<key>.json          raw detail documents, exactly as fetched
//!     templates/<key>.tmpl    rendered templates
//!     index.json              the raw index, exactly as fetched
//! ```
//!
//! A successful bootstrap replaces the whole root in one move; nothing else
//! ever writes here.

use std::path::PathBuf;

use crate::error::Error;

/// Name of the cache root under the home directory
const CACHE_DIR_NAME: &str = ".lichen";

/// Environment variable overriding the cache root
pub const CACHE_DIR_ENV: &str = "LICHEN_DIR";

pub(crate) const DATA_DIR: &str = "data";
pub(crate) const RAW_DIR: &str = "raw";
pub(crate) const TEMPLATES_DIR: &str = "templates";
pub(crate) const INDEX_FILE: &str = "index.json";

/// Resolved paths of the user-visible cache
#[derive(Debug, Clone)]
pub struct CacheDir {
    /// Cache root, replaced wholesale by a successful bootstrap
    pub root: PathBuf,

    /// Committed data directory under the root
    pub data_dir: PathBuf,

    /// Raw detail documents, one JSON file per key
    pub raw_dir: PathBuf,

    /// Rendered templates, one file per key
    pub templates_dir: PathBuf,

    /// The raw index as fetched
    pub index_file: PathBuf,
}

impl CacheDir {
    /// Locate the cache for the invoking user
    ///
    /// `LICHEN_DIR` overrides the location; otherwise the cache sits in
    /// the user's home directory.
    pub fn discover() -> Result<Self, Error> {
        if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(Self::at(PathBuf::from(dir)));
            }
        }

        let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        Ok(Self::at(home.join(CACHE_DIR_NAME)))
    }

    /// Describe a cache rooted at an explicit path
    pub fn at(root: PathBuf) -> Self {
        let data_dir = root.join(DATA_DIR);
        Self {
            raw_dir: data_dir.join(RAW_DIR),
            templates_dir: data_dir.join(TEMPLATES_DIR),
            index_file: data_dir.join(INDEX_FILE),
            data_dir,
            root,
        }
    }

    /// Path of the raw detail document for `key`
    pub fn raw_path(&self, key: &str) -> PathBuf {
        self.raw_dir.join(format!("{key}.json"))
    }

    /// Path of the rendered template for `key`
    pub fn template_path(&self, key: &str) -> PathBuf {
        self.templates_dir.join(format!("{key}.tmpl"))
    }

    /// Read the committed raw index bytes
    pub fn read_index(&self) -> Result<Vec<u8>, Error> {
        std::fs::read(&self.index_file).map_err(|err| Error::ReadIndex {
            path: self.index_file.clone(),
            source: err,
        })
    }

    /// Read the committed template for `key`
    pub fn read_template(&self, key: &str) -> Result<String, Error> {
        let path = self.template_path(key);
        std::fs::read_to_string(&path).map_err(|err| Error::ReadTemplate {
            key: key.to_string(),
            path,
            source: err,
        })
    }
}
