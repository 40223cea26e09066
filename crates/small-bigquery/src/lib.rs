//! A small, hand-written client for the BigQuery v2 REST API.
//!
//! Covers the read-side surface needed to measure datasets: an authenticated
//! client handle, single-page table listing, and per-table metadata fetches.
//! Anything heavier (jobs, queries, mutations) is out of scope.

mod auth;
mod client;
mod dataset;
pub mod error;
pub mod resources;
mod scope;

pub use auth::Auth;
pub use client::{BASE_URL, BigQueryClient};
pub use dataset::DatasetClient;
pub use error::Error;
pub(crate) use error::validate_response;
pub use scope::Scope;

/// Re-export [`gcp_auth::Error`] so consumers of this crate can unpack
/// [`Error`] into their own types without depending on [`gcp_auth`] directly.
pub use gcp_auth::Error as GcpAuthError;
/// Re-export [`reqwest::Url`] for [`BigQueryClient::from_parts`] callers.
pub use reqwest::Url;

pub type Result<T> = std::result::Result<T, Error>;
