#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types produced by the ride analytics engine.
//!
//! Every type here is a pure function of one fetched payload; nothing is
//! carried over between fetches.

use std::collections::BTreeMap;

use ride_insights_ride_models::TimeBucketRecord;
use serde::{Deserialize, Serialize};

/// Records decoded from a payload, plus how many were malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoded<T> {
    /// Well-formed records in input order.
    pub records: Vec<T>,
    /// Number of records excluded because they were malformed.
    pub dropped: usize,
}

/// Aggregate statistics over a bucketed ride-count sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    /// Sum of all ride counts.
    pub total: u64,
    /// `total / buckets`, rounded half up. Zero for an empty sequence.
    pub average: u64,
    /// Record with the highest ride count, earliest wins ties.
    pub peak: Option<TimeBucketRecord>,
    /// Record with the lowest ride count, earliest wins ties.
    pub trough: Option<TimeBucketRecord>,
    /// Number of buckets with at least one ride.
    pub active_buckets: usize,
    /// Number of buckets present in the input.
    pub bucket_count: usize,
}

impl DistributionSummary {
    /// Highest ride count, or zero when empty.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.peak.as_ref().map_or(0, |r| r.ride_count)
    }

    /// Lowest ride count, or zero when empty.
    #[must_use]
    pub fn min_count(&self) -> u64 {
        self.trough.as_ref().map_or(0, |r| r.ride_count)
    }
}

/// A bucket together with its position in the descending ride-count order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedBucket {
    /// 1-based rank; rank 1 has the most rides.
    pub rank: usize,
    /// The ranked record.
    pub record: TimeBucketRecord,
    /// Share of the total, 0-100. Zero when the total is zero.
    pub percent_of_total: f64,
}

/// Weekend versus weekday split of a weekday distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdaySplit {
    /// Rides on Sunday (0) and Saturday (6).
    pub weekend_total: u64,
    /// All other rides.
    pub weekday_total: u64,
    /// Weekend share, 0-100. Zero when there are no rides.
    pub weekend_percent: f64,
    /// Weekday share, 0-100. Zero when there are no rides.
    pub weekday_percent: f64,
}

/// Point counts per cluster label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Number of distinct cluster labels.
    pub unique_clusters: usize,
    /// Points per cluster label, ordered by label.
    pub points_per_cluster: BTreeMap<u64, usize>,
    /// Total number of points.
    pub total_points: usize,
}
