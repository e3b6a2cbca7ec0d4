//! Remote license sources
//!
//! Abstracts the provider of the license index and the per-license detail
//! documents. The production source talks to the GitHub licenses API; tests
//! substitute programmable sources.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::LicenseSummary;

pub use reqwest::StatusCode;

/// Default license index URL (the GitHub licenses API)
pub const DEFAULT_INDEX_URL: &str = "https://api.github.com/licenses";

/// Media type GitHub asks REST clients to request
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Errors from a remote license source
#[derive(Error, Debug)]
pub enum SourceError {
    /// The HTTP client could not be constructed
    #[error("Failed to create HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or its body could not be read
    #[error("Request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The source answered with a non-success status
    #[error("Unexpected HTTP {status} from {url}")]
    Status { url: String, status: StatusCode },

    /// The source answered with a body that is not license data
    #[error("Malformed response from the {name} source")]
    Malformed {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A provider of license index and license detail bytes
///
/// Implementations return raw bytes so callers can persist the payload
/// exactly as received; decoding stays with the caller.
#[async_trait]
pub trait LicenseSource: Send + Sync {
    /// Fetch the raw bytes of the full license index
    async fn fetch_index(&self) -> Result<Vec<u8>, SourceError>;

    /// Fetch the raw bytes of one license's detail document
    ///
    /// The summary carries the fetch handle published by the index;
    /// implementations may derive a location from the key when the index
    /// did not publish one.
    async fn fetch_detail(&self, summary: &LicenseSummary) -> Result<Vec<u8>, SourceError>;

    /// Short source identifier for logging
    fn name(&self) -> &'static str;
}

/// License source backed by the GitHub licenses API
pub struct GithubSource {
    client: reqwest::Client,
    base_url: String,
}

impl GithubSource {
    /// Create a source against the public GitHub API
    pub fn new() -> Result<Self, SourceError> {
        Self::with_base_url(DEFAULT_INDEX_URL)
    }

    /// Create a source against a custom index URL (for mirrors and tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lichen/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(SourceError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Resolve the URL of one license's detail document
    fn detail_url(&self, summary: &LicenseSummary) -> String {
        match &summary.url {
            Some(url) => url.clone(),
            None => format!("{}/{}", self.base_url.trim_end_matches('/'), summary.key),
        }
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, GITHUB_MEDIA_TYPE)
            .send()
            .await
            .map_err(|err| SourceError::Request {
                url: url.to_string(),
                source: err,
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body = response.bytes().await.map_err(|err| SourceError::Request {
            url: url.to_string(),
            source: err,
        })?;

        Ok(body.to_vec())
    }
}

#[async_trait]
impl LicenseSource for GithubSource {
    async fn fetch_index(&self) -> Result<Vec<u8>, SourceError> {
        tracing::debug!("Fetching license index from {}", self.base_url);
        self.get(&self.base_url).await
    }

    async fn fetch_detail(&self, summary: &LicenseSummary) -> Result<Vec<u8>, SourceError> {
        let url = self.detail_url(summary);
        tracing::debug!("Fetching license detail for '{}' from {}", summary.key, url);
        self.get(&url).await
    }

    fn name(&self) -> &'static str {
        "github"
    }
}
