//! Clients for the external services VerdePM depends on.
//!
//! - [`auth`] -- hosted auth provider (GoTrue-compatible REST API).
//! - [`storage`] -- object storage behind the [`storage::ObjectStore`] trait,
//!   with a remote REST backend and a local filesystem backend.
//! - [`geocoding`] -- forward/reverse geocoding (Nominatim-compatible).
//!
//! Every call is a single attempt; there is no retry or backoff.

pub mod auth;
pub mod geocoding;
pub mod storage;

use std::time::Duration;

/// Timeout applied to every outbound HTTP request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the shared [`reqwest::Client`] used by the remote clients.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()
}
