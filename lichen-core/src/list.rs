//! Listing available licenses
//!
//! Local listings read the committed index; remote listings ask the source
//! for a fresh one. Both come back sorted by key so output is stable
//! regardless of the order the index was published in.

use crate::cache::CacheDir;
use crate::catalog::{self, LicenseSummary};
use crate::error::Error;
use crate::source::{LicenseSource, SourceError};

/// List the locally cached licenses, sorted by key
///
/// A corrupt index surfaces the same way a missing one does: as a local
/// read error carrying the bootstrap hint.
pub fn local(cache: &CacheDir) -> Result<Vec<LicenseSummary>, Error> {
    let bytes = cache.read_index()?;
    let mut licenses = catalog::decode_index(&bytes).map_err(|err| match err {
        Error::Deserialize { source, .. } => Error::ReadIndex {
            path: cache.index_file.clone(),
            source: source.into(),
        },
        other => other,
    })?;
    catalog::sort_by_key(&mut licenses);
    Ok(licenses)
}

/// List the licenses the remote source currently offers, sorted by key
///
/// An index that does not decode is reported as a source failure, the
/// same as an unreachable one.
pub async fn remote(source: &dyn LicenseSource) -> Result<Vec<LicenseSummary>, Error> {
    let bytes = source.fetch_index().await?;
    let mut licenses = catalog::decode_index(&bytes).map_err(|err| match err {
        Error::Deserialize { source: cause, .. } => Error::Fetch(SourceError::Malformed {
            name: source.name(),
            source: cause,
        }),
        other => other,
    })?;
    catalog::sort_by_key(&mut licenses);
    Ok(licenses)
}
