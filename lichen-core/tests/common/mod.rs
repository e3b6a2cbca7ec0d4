//! Shared fixtures for integration tests
//!
//! Provides a programmable in-memory license source plus small helpers for
//! inspecting cache trees. Shared across test files via the tests/common/
//! pattern.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use lichen_core::catalog::LicenseSummary;
use lichen_core::progress::Progress;
use lichen_core::source::{LicenseSource, SourceError, StatusCode};

/// Index payload in the shape the GitHub licenses API returns
pub fn index_json(licenses: &[(&str, &str)]) -> Vec<u8> {
    let entries: Vec<String> = licenses
        .iter()
        .map(|(key, name)| {
            format!(
                r#"{{"key":"{key}","name":"{name}","spdx_id":null,"url":"mock://licenses/{key}"}}"#
            )
        })
        .collect();

    format!("[{}]", entries.join(",")).into_bytes()
}

/// Detail payload in the shape the GitHub licenses API returns
pub fn detail_json(key: &str, name: &str) -> Vec<u8> {
    format!(
        r#"{{"key":"{key}","name":"{name}","spdx_id":null,"body":"{name}\n\nCopyright (c) [year] [fullname]\n","permissions":["commercial-use"],"conditions":[],"limitations":[]}}"#
    )
    .into_bytes()
}

/// In-memory license source with per-key failure injection
pub struct MockSource {
    index: Vec<u8>,
    details: HashMap<String, Vec<u8>>,
    fail_index: bool,
    fail_details: HashSet<String>,
    panic_details: HashSet<String>,

    /// Number of index fetches observed
    pub index_calls: AtomicUsize,

    /// Number of detail fetches observed, across all keys
    pub detail_calls: AtomicUsize,
}

impl MockSource {
    /// Source serving the given (key, name) pairs
    pub fn new(licenses: &[(&str, &str)]) -> Self {
        let details = licenses
            .iter()
            .map(|(key, name)| ((*key).to_string(), detail_json(key, name)))
            .collect();

        Self {
            index: index_json(licenses),
            details,
            fail_index: false,
            fail_details: HashSet::new(),
            panic_details: HashSet::new(),
            index_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }

    /// Make the index fetch fail with a server error
    pub fn failing_index(mut self) -> Self {
        self.fail_index = true;
        self
    }

    /// Make the detail fetch for `key` fail with a server error
    pub fn failing_detail(mut self, key: &str) -> Self {
        self.fail_details.insert(key.to_string());
        self
    }

    /// Make the detail fetch for `key` panic instead of returning
    pub fn panicking_detail(mut self, key: &str) -> Self {
        self.panic_details.insert(key.to_string());
        self
    }

    /// Replace the index payload with arbitrary bytes
    pub fn corrupt_index(mut self, bytes: &[u8]) -> Self {
        self.index = bytes.to_vec();
        self
    }

    /// Replace the detail payload for `key` with arbitrary bytes
    pub fn corrupt_detail(mut self, key: &str, bytes: &[u8]) -> Self {
        self.details.insert(key.to_string(), bytes.to_vec());
        self
    }

    fn server_error(url: String) -> SourceError {
        SourceError::Status {
            url,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[async_trait]
impl LicenseSource for MockSource {
    async fn fetch_index(&self) -> Result<Vec<u8>, SourceError> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_index {
            return Err(Self::server_error("mock://licenses".to_string()));
        }

        Ok(self.index.clone())
    }

    async fn fetch_detail(&self, summary: &LicenseSummary) -> Result<Vec<u8>, SourceError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);

        let url = format!("mock://licenses/{}", summary.key);

        if self.fail_details.contains(&summary.key) {
            return Err(Self::server_error(url));
        }

        if self.panic_details.contains(&summary.key) {
            panic!("detail fetch for '{}' dropped mid-flight", summary.key);
        }

        match self.details.get(&summary.key) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(SourceError::Status {
                url,
                status: StatusCode::NOT_FOUND,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Progress reporter that records checkpoint names in order
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<String>>,
    staged_index: Mutex<Option<PathBuf>>,
}

impl RecordingProgress {
    /// The checkpoints observed so far, oldest first
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// The staged index path the index_written checkpoint reported
    pub fn staged_index(&self) -> Option<PathBuf> {
        self.staged_index.lock().unwrap().clone()
    }

    fn record(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }
}

impl Progress for RecordingProgress {
    fn index_fetched(&self, _bytes: usize) {
        self.record("index_fetched");
    }

    fn index_written(&self, path: &Path) {
        *self.staged_index.lock().unwrap() = Some(path.to_path_buf());
        self.record("index_written");
    }

    fn templates_written(&self, _licenses: usize) {
        self.record("templates_written");
    }

    fn committed(&self, _path: &Path) {
        self.record("committed");
    }
}

/// Snapshot a directory tree as relative path -> file contents
pub fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    collect(root, root, &mut files);
    files
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned();
            files.insert(relative, std::fs::read(&path).unwrap());
        }
    }
}
