#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Categorical mapping for ride visualizations.
//!
//! Two strategies assign stable visual categories to data values:
//!
//! 1. **Fixed palette lookup** ([`Palette`]): cluster ID to color by
//!    `id mod palette_size`, so any ID gets a repeatable color.
//! 2. **Relative-intensity banding** ([`band`]): a value's ratio to the
//!    dataset maximum is bucketed into [`Band::Low`], [`Band::Medium`] or
//!    [`Band::High`]. On the weekday panel, Sunday and Saturday are always
//!    [`Band::Weekend`] ([`weekday_band`]).
//!
//! [`style`] holds the fixed rendering parameters handed to chart and map
//! renderers alongside the categorized data.

pub mod style;

use ride_insights_ride_models::{BucketKind, TimeBucketRecord, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Ratios strictly above this are [`Band::High`].
pub const HIGH_THRESHOLD: f64 = 0.8;

/// Ratios strictly above this (and not above [`HIGH_THRESHOLD`]) are
/// [`Band::Medium`].
pub const MEDIUM_THRESHOLD: f64 = 0.5;

/// Categorical label for a bucket's ride volume.
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
pub enum Band {
    /// Ratio to max at most 0.5.
    Low,
    /// Ratio to max in `(0.5, 0.8]`.
    Medium,
    /// Ratio to max above 0.8.
    High,
    /// Saturday or Sunday on the weekday panel.
    Weekend,
}

impl Band {
    /// Fill color used for bars in this band.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#a5b4fc",
            Self::Medium => "#6366f1",
            Self::High => "#3730a3",
            Self::Weekend => "#f59e0b",
        }
    }
}

/// `value / max`, or 0 when `max` is 0.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn intensity_ratio(value: u64, max: u64) -> f64 {
    if max == 0 {
        return 0.0;
    }
    value as f64 / max as f64
}

/// Classifies a ratio with strict `>` thresholds.
#[must_use]
pub fn band_for_ratio(ratio: f64) -> Band {
    if ratio > HIGH_THRESHOLD {
        Band::High
    } else if ratio > MEDIUM_THRESHOLD {
        Band::Medium
    } else {
        Band::Low
    }
}

/// Bands `value` relative to the dataset maximum `max`.
#[must_use]
pub fn band(value: u64, max: u64) -> Band {
    band_for_ratio(intensity_ratio(value, max))
}

/// Bands a weekday bucket; the weekend override beats intensity.
#[must_use]
pub fn weekday_band(weekday: Weekday, value: u64, max: u64) -> Band {
    if weekday.is_weekend() {
        return Band::Weekend;
    }
    band(value, max)
}

/// Bands a record from a sequence of the given kind.
///
/// Weekday records at index 0 or 6 get [`Band::Weekend`]; everything else
/// is banded by intensity.
#[must_use]
pub fn bucket_band(record: &TimeBucketRecord, kind: BucketKind, max: u64) -> Band {
    if kind == BucketKind::Weekday
        && let Some(weekday) = record.bucket.index().and_then(Weekday::from_index)
    {
        return weekday_band(weekday, record.ride_count, max);
    }
    band(record.ride_count, max)
}

/// A named color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PaletteColor {
    /// CSS color name.
    pub name: &'static str,
    /// `#rrggbb` hex value.
    pub hex: &'static str,
}

/// Cluster colors, in assignment order.
pub const CLUSTER_COLORS: &[PaletteColor] = &[
    PaletteColor {
        name: "red",
        hex: "#ff0000",
    },
    PaletteColor {
        name: "blue",
        hex: "#0000ff",
    },
    PaletteColor {
        name: "green",
        hex: "#008000",
    },
    PaletteColor {
        name: "orange",
        hex: "#ffa500",
    },
    PaletteColor {
        name: "purple",
        hex: "#800080",
    },
];

/// A finite, ordered, non-empty color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette<'a> {
    entries: &'a [PaletteColor],
}

impl<'a> Palette<'a> {
    /// Wraps `entries`, or `None` if it is empty.
    #[must_use]
    pub const fn new(entries: &'a [PaletteColor]) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }
        Some(Self { entries })
    }

    /// Number of colors in the palette.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; palettes cannot be empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Color for `cluster_id`, wrapping around when IDs outnumber colors.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn color_for(&self, cluster_id: u64) -> PaletteColor {
        let index = cluster_id % self.entries.len() as u64;
        self.entries[index as usize]
    }
}

impl Default for Palette<'static> {
    fn default() -> Self {
        Self {
            entries: CLUSTER_COLORS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banding_boundaries() {
        assert_eq!(band(80, 100), Band::Medium, "exactly 0.8 is not High");
        assert_eq!(band(81, 100), Band::High);
        assert_eq!(band(50, 100), Band::Low, "exactly 0.5 is not Medium");
        assert_eq!(band(51, 100), Band::Medium);
        assert_eq!(band(100, 100), Band::High);
        assert_eq!(band(0, 100), Band::Low);
        assert_eq!(band_for_ratio(0.8), Band::Medium);
        assert_eq!(band_for_ratio(0.81), Band::High);
        assert_eq!(band_for_ratio(0.5), Band::Low);
    }

    #[test]
    fn zero_max_is_low() {
        assert!(intensity_ratio(0, 0).abs() < f64::EPSILON);
        assert_eq!(band(0, 0), Band::Low);
        assert_eq!(band(7, 0), Band::Low);
    }

    #[test]
    fn weekend_override_beats_intensity() {
        for value in [0, 10, 50, 81, 100] {
            assert_eq!(weekday_band(Weekday::Sunday, value, 100), Band::Weekend);
            assert_eq!(weekday_band(Weekday::Saturday, value, 100), Band::Weekend);
        }
        assert_eq!(weekday_band(Weekday::Wednesday, 100, 100), Band::High);
        assert_eq!(weekday_band(Weekday::Monday, 10, 100), Band::Low);
    }

    #[test]
    fn bucket_band_only_overrides_weekday_kind() {
        let sunday = TimeBucketRecord::new(0, 100);
        assert_eq!(bucket_band(&sunday, BucketKind::Weekday, 100), Band::Weekend);
        assert_eq!(bucket_band(&sunday, BucketKind::Hour, 100), Band::High);

        let saturday = TimeBucketRecord::new(6, 1);
        assert_eq!(
            bucket_band(&saturday, BucketKind::Weekday, 100),
            Band::Weekend
        );
        assert_eq!(bucket_band(&saturday, BucketKind::Day, 100), Band::Low);
    }

    #[test]
    fn palette_wraps_around() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 5);
        assert_eq!(palette.color_for(0).name, "red");
        assert_eq!(palette.color_for(4).name, "purple");
        assert_eq!(palette.color_for(5).name, "red");
        assert_eq!(palette.color_for(7), palette.color_for(2));
        assert_eq!(palette.color_for(u64::MAX), palette.color_for(u64::MAX % 5));
    }

    #[test]
    fn palette_is_deterministic() {
        let palette = Palette::default();
        for id in 0..50 {
            assert_eq!(palette.color_for(id), palette.color_for(id));
        }
    }

    #[test]
    fn empty_palette_is_rejected() {
        assert!(Palette::new(&[]).is_none());
        let single = [PaletteColor {
            name: "black",
            hex: "#000000",
        }];
        let palette = Palette::new(&single).unwrap();
        assert_eq!(palette.color_for(123).name, "black");
    }
}
