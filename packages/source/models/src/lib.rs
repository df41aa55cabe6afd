#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Identifiers for the ride analytics endpoints.
//!
//! Every panel fetches exactly one [`Endpoint`]. The backend takes no
//! request parameters; each call returns the full dataset for that route.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A named analytics route on the ride backend.
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
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Endpoint {
    /// Ride counts per day of month.
    Daily,
    /// Ride counts per hour of day.
    Hourly,
    /// Ride counts per weekday.
    Weekday,
    /// Dataset-wide summary statistics.
    Summary,
    /// Pickup coordinates labelled with cluster IDs.
    Clusters,
    /// Sampled pickup coordinates.
    Heatmap,
}

impl Endpoint {
    /// Route path relative to the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Daily => "/rides/daily",
            Self::Hourly => "/rides/hourly",
            Self::Weekday => "/rides/weekday",
            Self::Summary => "/rides/summary",
            Self::Clusters => "/rides/clusters",
            Self::Heatmap => "/rides/heatmap",
        }
    }
}
