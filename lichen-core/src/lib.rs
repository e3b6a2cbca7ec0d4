//! Core engine for lichen
//!
//! Keeps a local cache of open source license templates under the user's
//! home directory and refreshes it atomically from a remote license index:
//! a refresh either commits in full or leaves the previous cache untouched.
//!
//! The pieces, bottom to top:
//!
//! - [`source`]: where license data comes from ([`source::GithubSource`]
//!   in production, programmable sources in tests)
//! - [`catalog`]: the index and detail data model plus decoding
//! - [`template`]: rewriting upstream license bodies into fillable templates
//! - [`cache`] and [`staging`]: the committed layout and its scratch twin
//! - [`bootstrap`]: the concurrent refresh that ties them together
//! - [`list`]: local and remote listings

pub mod bootstrap;
pub mod cache;
pub mod catalog;
pub mod error;
pub mod list;
pub mod progress;
pub mod source;
pub mod staging;
pub mod template;

pub use error::Error;
