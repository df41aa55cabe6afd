#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View state controller for ride analytics panels.
//!
//! Each panel runs the same pipeline independently: fetch one endpoint,
//! decode and aggregate the payload, categorize the result, and publish a
//! [`PanelViewState`]. A [`PanelController`] owns exactly one panel's
//! state and enforces the lifecycle
//!
//! ```text
//! Idle --mount--> Loading --success--> Ready
//!                 Loading --failure--> Error
//! Ready | Error --refresh--> Loading
//! ```
//!
//! Refreshes are ticketed: only the most recently initiated refresh may
//! settle the panel, whatever order responses arrive in, and nothing
//! settles after [`PanelController::teardown`].

pub mod controller;
pub mod dashboard;
pub mod pipeline;
pub mod state;

#[cfg(test)]
mod test_support;

use ride_insights_analytics::AnalyticsError;
use ride_insights_source::{FetchError, RawPayload};
use ride_insights_source_models::Endpoint;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use strum_macros::{AsRefStr, Display, EnumString};

pub use controller::{PanelController, RefreshTicket};
pub use dashboard::Dashboard;
pub use pipeline::PanelPipeline;
pub use state::{Loaded, PanelFailure, PanelStatus, PanelViewState};

/// The six dashboard panels.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PanelKind {
    Hourly,
    Daily,
    Weekday,
    Summary,
    Clusters,
    Heatmap,
}

impl PanelKind {
    pub const ALL: [Self; 6] = [
        Self::Hourly,
        Self::Daily,
        Self::Weekday,
        Self::Summary,
        Self::Clusters,
        Self::Heatmap,
    ];

    /// Endpoint this panel fetches.
    #[must_use]
    pub const fn endpoint(self) -> Endpoint {
        match self {
            Self::Hourly => Endpoint::Hourly,
            Self::Daily => Endpoint::Daily,
            Self::Weekday => Endpoint::Weekday,
            Self::Summary => Endpoint::Summary,
            Self::Clusters => Endpoint::Clusters,
            Self::Heatmap => Endpoint::Heatmap,
        }
    }

    /// Panel heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Hourly => "Hourly Ride Distribution",
            Self::Daily => "Daily Ride Distribution",
            Self::Weekday => "Weekday Ride Distribution",
            Self::Summary => "Ride Summary",
            Self::Clusters => "Pickup Clusters",
            Self::Heatmap => "Ride Pickup Density Heatmap",
        }
    }
}

/// Failure category shown to the user, one per error source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Backend unreachable or timed out.
    Network,
    /// Backend answered with a non-2xx status.
    Server,
    /// Payload present but unusable.
    MalformedData,
}

/// Errors that can fail a panel refresh.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// Fetching the endpoint failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The payload could not be interpreted.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

impl PanelError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch(FetchError::Network { .. }) => ErrorKind::Network,
            Self::Fetch(FetchError::Server { .. }) => ErrorKind::Server,
            Self::Fetch(FetchError::Malformed { .. }) | Self::Analytics(_) => {
                ErrorKind::MalformedData
            }
        }
    }

    /// Message suitable for display in the panel's error state.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch(FetchError::Network { .. }) => {
                "Could not reach the ride analytics service. Check the connection and retry."
                    .to_string()
            }
            Self::Fetch(FetchError::Server { status, .. }) => {
                format!("The ride analytics service returned HTTP {status}. Retry later.")
            }
            Self::Fetch(FetchError::Malformed { .. }) | Self::Analytics(_) => {
                "The ride analytics service sent data that could not be read.".to_string()
            }
        }
    }
}

/// SHA-256 of a payload's canonical JSON text, hex encoded.
///
/// Identifies the payload a derived view was computed from, so that an
/// identical refresh can reuse the view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PayloadDigest(String);

impl PayloadDigest {
    #[must_use]
    pub fn of(payload: &RawPayload) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(payload.to_string().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PayloadDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0[..12.min(self.0.len())])
    }
}
