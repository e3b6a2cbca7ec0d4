//! License catalog data model
//!
//! The index is a JSON array of license summaries; each detail document is
//! a superset of its summary. Decoding keeps the source ordering and hands
//! back the raw payload when the bytes do not parse.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One entry of the license index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSummary {
    /// Stable identifier, unique within the index (e.g. "mit", "apache-2.0")
    pub key: String,

    /// Human-readable display name
    pub name: String,

    /// SPDX identifier, when the source publishes one
    #[serde(default)]
    pub spdx_id: Option<String>,

    /// Fetch handle for the full detail document
    #[serde(default)]
    pub url: Option<String>,
}

/// The full record for one license
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseDetail {
    /// Stable identifier, matching the index entry
    pub key: String,

    /// Human-readable display name
    pub name: String,

    /// SPDX identifier
    #[serde(default)]
    pub spdx_id: Option<String>,

    /// The license text, with the upstream placeholder tokens intact
    pub body: String,

    /// Short description of the license
    #[serde(default)]
    pub description: Option<String>,

    /// Guidance on how to apply the license
    #[serde(default)]
    pub implementation: Option<String>,

    /// What the license permits
    #[serde(default)]
    pub permissions: Vec<String>,

    /// What the license requires
    #[serde(default)]
    pub conditions: Vec<String>,

    /// What the license forbids
    #[serde(default)]
    pub limitations: Vec<String>,

    /// Browse URL for the license text
    #[serde(default)]
    pub html_url: Option<String>,

    /// Whether the source features this license prominently
    #[serde(default)]
    pub featured: bool,
}

/// Decode raw index bytes into the list of license summaries
///
/// The returned order is the encoded order. Callers that need sorted
/// output sort explicitly (see [`sort_by_key`]).
pub fn decode_index(bytes: &[u8]) -> Result<Vec<LicenseSummary>, Error> {
    serde_json::from_slice(bytes).map_err(|err| Error::Deserialize {
        payload: bytes.to_vec(),
        source: err,
    })
}

/// Decode one license's detail document
pub fn decode_detail(bytes: &[u8]) -> Result<LicenseDetail, Error> {
    serde_json::from_slice(bytes).map_err(|err| Error::Deserialize {
        payload: bytes.to_vec(),
        source: err,
    })
}

/// Sort summaries in place by key, ascending byte-wise
pub fn sort_by_key(licenses: &mut [LicenseSummary]) {
    licenses.sort_by(|a, b| a.key.cmp(&b.key));
}
