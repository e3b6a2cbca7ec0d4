//! Cache bootstrap
//!
//! One refresh fetches the index, stages everything under a scratch root,
//! materializes every listed license concurrently, and replaces the real
//! cache in a single move only when every license succeeded. A failed
//! refresh leaves the previous cache exactly as it was.

use std::io;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::cache::CacheDir;
use crate::catalog::{self, LicenseSummary};
use crate::error::Error;
use crate::progress::Progress;
use crate::source::LicenseSource;
use crate::staging::StagingArea;
use crate::template;

/// Result of one license's materialization
#[derive(Debug)]
pub struct RefreshOutcome {
    /// Key of the license this outcome belongs to
    pub key: String,

    /// Success, or the failure that stopped this license
    pub result: Result<(), Error>,
}

/// Refresh the entire local cache from the remote source
///
/// Fetches the index once, materializes every listed license concurrently
/// into a staging area, and atomically replaces `cache` only when all of
/// them succeeded. On any failure the previous cache stays untouched and
/// the staging area is deleted. Returns the number of licenses cached.
pub async fn refresh(
    source: Arc<dyn LicenseSource>,
    cache: &CacheDir,
    progress: &dyn Progress,
) -> Result<usize, Error> {
    // Index first: a dead source must fail before anything is staged.
    let index_bytes = source.fetch_index().await?;
    progress.index_fetched(index_bytes.len());

    let staging = StagingArea::create()?;

    tokio::fs::write(&staging.index_file, &index_bytes)
        .await
        .map_err(|err| Error::WriteFile {
            path: staging.index_file.clone(),
            source: err,
        })?;
    progress.index_written(&staging.index_file);

    let licenses = catalog::decode_index(&index_bytes)?;
    debug!(
        "Decoded {} licenses from the {} index",
        licenses.len(),
        source.name()
    );

    let total = licenses.len();
    if let Some(failure) = fan_out(&source, licenses, &staging).await {
        return Err(failure);
    }
    progress.templates_written(total);

    commit(&staging, cache)?;
    progress.committed(&cache.root);

    Ok(total)
}

/// Launch one materialization task per license and drain every outcome
///
/// Returns the first failure drained, if any; a launched task that never
/// reports counts as a failure too. Every task runs to completion either
/// way; the channel holds one slot per license, so no task ever blocks on
/// the drain.
async fn fan_out(
    source: &Arc<dyn LicenseSource>,
    licenses: Vec<LicenseSummary>,
    staging: &StagingArea,
) -> Option<Error> {
    if licenses.is_empty() {
        return None;
    }

    let expected = licenses.len();
    let (tx, mut rx) = mpsc::channel::<RefreshOutcome>(expected);

    for license in licenses {
        // Each task owns its summary, its directories and a source handle.
        let tx = tx.clone();
        let source = Arc::clone(source);
        let raw_dir = staging.raw_dir.clone();
        let templates_dir = staging.templates_dir.clone();

        tokio::spawn(async move {
            let result = materialize(source.as_ref(), &license, &raw_dir, &templates_dir).await;
            // The capacity covers every task; a send only fails once the
            // drain loop is gone.
            let _ = tx
                .send(RefreshOutcome {
                    key: license.key,
                    result,
                })
                .await;
        });
    }

    // The drain below observes channel closure once every clone is dropped.
    drop(tx);

    let mut drained = 0;
    let mut first_failure = None;
    while let Some(outcome) = rx.recv().await {
        drained += 1;
        match outcome.result {
            Ok(()) => debug!("Materialized '{}'", outcome.key),
            Err(err) => {
                debug!("Materializing '{}' failed: {err}", outcome.key);
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
        }
    }

    // Every task posts exactly one outcome; a short count means one died
    // without posting and its license is missing from staging.
    if first_failure.is_none() && drained != expected {
        first_failure = Some(Error::Incomplete { expected, drained });
    }

    first_failure
}

/// Materialize one license into the staging area
///
/// Fetches the full detail document, persists it verbatim to
/// `raw_dir/<key>.json` and the rendered template to
/// `templates_dir/<key>.tmpl`. A failed step may leave a partial file in
/// staging; the staging area as a whole is discarded when any license
/// fails, so partials never reach the cache.
async fn materialize(
    source: &dyn LicenseSource,
    license: &LicenseSummary,
    raw_dir: &Path,
    templates_dir: &Path,
) -> Result<(), Error> {
    let detail_bytes = source.fetch_detail(license).await?;
    let detail = catalog::decode_detail(&detail_bytes)?;

    let raw_path = raw_dir.join(format!("{}.json", license.key));
    tokio::fs::write(&raw_path, &detail_bytes)
        .await
        .map_err(|err| Error::WriteFile {
            path: raw_path.clone(),
            source: err,
        })?;

    let template_path = templates_dir.join(format!("{}.tmpl", license.key));
    tokio::fs::write(&template_path, template::render(&detail))
        .await
        .map_err(|err| Error::WriteFile {
            path: template_path.clone(),
            source: err,
        })?;

    Ok(())
}

/// Replace the real cache with the staged data
///
/// The old cache root is removed first. A missing root is fine, and any
/// removal failure other than a permission error is left for the move
/// below to surface.
fn commit(staging: &StagingArea, cache: &CacheDir) -> Result<(), Error> {
    match std::fs::remove_dir_all(&cache.root) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            return Err(Error::RemovePath {
                path: cache.root.clone(),
                source: err,
            });
        }
        Err(err) => debug!("Clearing {} failed: {err}", cache.root.display()),
    }

    std::fs::create_dir_all(&cache.root).map_err(|err| Error::CreateDir {
        path: cache.root.clone(),
        source: err,
    })?;

    move_tree(&staging.data_dir, &cache.data_dir).map_err(|err| Error::CopyTree {
        src: staging.data_dir.clone(),
        dst: cache.data_dir.clone(),
        source: err,
    })?;

    Ok(())
}

/// Move a directory tree, copying when a rename is not possible
///
/// Staging usually sits on another filesystem than the cache, where a
/// plain rename fails and the tree is copied instead.
fn move_tree(src: &Path, dst: &Path) -> io::Result<()> {
    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    copy_tree(src, dst)?;
    std::fs::remove_dir_all(src)
}

/// Recursively copy a directory tree
fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dst)?;

    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}
