#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data access adapter for the ride analytics backend.
//!
//! A [`RideSource`] issues one GET per [`Endpoint`] and hands back the
//! decoded JSON body untouched. It never retries: retry policy belongs to
//! the panel that owns the request. Failures are classified into
//! connectivity problems, non-2xx responses, and bodies that are not JSON.

pub mod config;
pub mod http;

use async_trait::async_trait;
use ride_insights_source_models::Endpoint;

pub use config::{ClientConfig, ConfigError};
pub use http::HttpRideSource;

/// Raw response body as returned by an endpoint.
pub type RawPayload = serde_json::Value;

/// Errors that can occur while fetching an endpoint.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The backend could not be reached or the request timed out.
    #[error("Network error fetching {endpoint}: {source}")]
    Network {
        /// Endpoint being fetched.
        endpoint: Endpoint,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status.
    #[error("Server returned HTTP {status} for {endpoint}")]
    Server {
        /// Endpoint being fetched.
        endpoint: Endpoint,
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded as JSON.
    #[error("Malformed payload from {endpoint}: {message}")]
    Malformed {
        /// Endpoint being fetched.
        endpoint: Endpoint,
        /// Description of what went wrong.
        message: String,
    },
}

impl FetchError {
    /// Endpoint the failed request targeted.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::Network { endpoint, .. }
            | Self::Server { endpoint, .. }
            | Self::Malformed { endpoint, .. } => *endpoint,
        }
    }
}

/// Anything that can produce raw payloads for analytics endpoints.
///
/// Implemented over HTTP by [`HttpRideSource`]; tests substitute scripted
/// in-memory sources.
#[async_trait]
pub trait RideSource: Send + Sync {
    /// Fetches the full payload for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the status is not 2xx,
    /// or the body is not JSON.
    async fn fetch(&self, endpoint: Endpoint) -> Result<RawPayload, FetchError>;
}
