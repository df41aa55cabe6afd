#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation and normalization engine for ride analytics payloads.
//!
//! Turns raw endpoint payloads into typed records ([`decode`]) and derives
//! the quantities each visualization needs: distribution statistics
//! ([`distribution`]), heatmap intensities ([`heatmap`]) and per-cluster
//! counts ([`clusters`]). All functions are synchronous and pure.
//!
//! Malformed individual records are excluded and counted, never fatal.
//! Only a payload whose overall shape is unusable yields an
//! [`AnalyticsError`].

pub mod clusters;
pub mod decode;
pub mod distribution;
pub mod heatmap;

use thiserror::Error;

/// Errors that can occur while interpreting a payload.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The payload is present but cannot be interpreted at all.
    #[error("Malformed payload: {message}")]
    MalformedPayload {
        /// Description of what went wrong.
        message: String,
    },
}

/// Share of `part` in `total` as a percentage, 0 when `total` is zero.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / total as f64
}
