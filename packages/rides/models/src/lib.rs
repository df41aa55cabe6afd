#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ride activity record types shared across the ride insights toolchain.
//!
//! These are the shapes the analytics backend returns (per-bucket ride
//! counts, summary statistics, pickup coordinates with optional cluster
//! labels) plus the one derived entity every map consumer needs, the
//! [`HeatmapCell`].

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which time unit a [`TimeBucketRecord`] sequence is bucketed by.
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
pub enum BucketKind {
    /// Hour of day, 0-23.
    Hour,
    /// Day of month, 1-31.
    Day,
    /// Weekday index, 0 (Sunday) through 6 (Saturday).
    Weekday,
}

impl BucketKind {
    /// Returns the JSON field name the backend uses for this bucket kind.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Weekday => "weekday",
        }
    }

    /// Returns `true` if `index` is a valid bucket for this kind.
    #[must_use]
    pub const fn contains(self, index: i64) -> bool {
        match self {
            Self::Hour => index >= 0 && index <= 23,
            Self::Day => index >= 1 && index <= 31,
            Self::Weekday => index >= 0 && index <= 6,
        }
    }
}

/// Identifies the bucket a ride count belongs to.
///
/// Numeric keys sort before labels, and numerically among themselves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BucketKey {
    /// Numeric bucket (hour, day of month, weekday index).
    Index(i64),
    /// Free-form bucket label.
    Label(String),
}

impl BucketKey {
    /// Returns the numeric index, if this is an [`BucketKey::Index`].
    #[must_use]
    pub const fn index(&self) -> Option<i64> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Label(_) => None,
        }
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

impl From<i64> for BucketKey {
    fn from(value: i64) -> Self {
        Self::Index(value)
    }
}

/// Ride count for a single time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucketRecord {
    /// Bucket this count belongs to.
    pub bucket: BucketKey,
    /// Number of rides in the bucket.
    pub ride_count: u64,
}

impl TimeBucketRecord {
    /// Creates a record for a numeric bucket.
    #[must_use]
    pub const fn new(bucket: i64, ride_count: u64) -> Self {
        Self {
            bucket: BucketKey::Index(bucket),
            ride_count,
        }
    }
}

/// Dataset-wide ride statistics as reported by the summary endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Total number of rides in the dataset.
    pub total_rides: u64,
    /// Mean rides per day, rounded to the nearest integer.
    pub avg_rides_per_day: u64,
    /// Fewest rides recorded on a single day.
    pub min_rides_per_day: u64,
    /// Most rides recorded on a single day.
    pub max_rides_per_day: u64,
}

impl SummaryStats {
    /// Checks `min <= avg <= max` and `total >= max`.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryInvariantError`] describing the first violated
    /// ordering.
    pub const fn validate(&self) -> Result<(), SummaryInvariantError> {
        if self.min_rides_per_day > self.avg_rides_per_day {
            return Err(SummaryInvariantError::MinAboveAverage {
                min: self.min_rides_per_day,
                avg: self.avg_rides_per_day,
            });
        }
        if self.avg_rides_per_day > self.max_rides_per_day {
            return Err(SummaryInvariantError::AverageAboveMax {
                avg: self.avg_rides_per_day,
                max: self.max_rides_per_day,
            });
        }
        if self.max_rides_per_day > self.total_rides {
            return Err(SummaryInvariantError::MaxAboveTotal {
                max: self.max_rides_per_day,
                total: self.total_rides,
            });
        }
        Ok(())
    }
}

/// A [`SummaryStats`] ordering invariant that does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryInvariantError {
    /// `min_rides_per_day > avg_rides_per_day`
    MinAboveAverage {
        /// Reported minimum.
        min: u64,
        /// Reported average.
        avg: u64,
    },
    /// `avg_rides_per_day > max_rides_per_day`
    AverageAboveMax {
        /// Reported average.
        avg: u64,
        /// Reported maximum.
        max: u64,
    },
    /// `max_rides_per_day > total_rides`
    MaxAboveTotal {
        /// Reported maximum.
        max: u64,
        /// Reported total.
        total: u64,
    },
}

impl std::fmt::Display for SummaryInvariantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinAboveAverage { min, avg } => {
                write!(f, "minimum rides per day {min} exceeds average {avg}")
            }
            Self::AverageAboveMax { avg, max } => {
                write!(f, "average rides per day {avg} exceeds maximum {max}")
            }
            Self::MaxAboveTotal { max, total } => {
                write!(f, "maximum rides per day {max} exceeds total rides {total}")
            }
        }
    }
}

impl std::error::Error for SummaryInvariantError {}

/// A pickup location in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, -90 to 90.
    #[serde(rename = "Lat", alias = "lat")]
    pub lat: f64,
    /// Longitude, -180 to 180.
    #[serde(rename = "Lon", alias = "lon")]
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point, returning `None` for non-finite or out-of-range
    /// coordinates.
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self { lat, lon })
    }

    /// Bit-exact identity of this coordinate pair, suitable as a map key.
    ///
    /// `-0.0` and `0.0` map to the same key.
    #[must_use]
    pub fn coordinate_key(&self) -> (u64, u64) {
        ((self.lat + 0.0).to_bits(), (self.lon + 0.0).to_bits())
    }
}

/// A pickup location labelled with an externally assigned cluster ID.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    /// Location of the pickup.
    #[serde(flatten)]
    pub point: GeoPoint,
    /// Opaque cluster label.
    pub cluster: u64,
}

/// One distinct coordinate pair with its relative pickup density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// Latitude of the grouped points.
    pub lat: f64,
    /// Longitude of the grouped points.
    pub lon: f64,
    /// Group size divided by the largest group size in the same dataset,
    /// in `(0, 1]`.
    pub intensity: f64,
}

/// Whether a weekday falls on the weekend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DayType {
    /// Monday through Friday.
    Weekday,
    /// Saturday and Sunday.
    Weekend,
}

/// Day of the week, indexed the way the weekday endpoint reports it
/// (0 = Sunday).
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
pub enum Weekday {
    /// Index 0.
    Sunday = 0,
    /// Index 1.
    Monday = 1,
    /// Index 2.
    Tuesday = 2,
    /// Index 3.
    Wednesday = 3,
    /// Index 4.
    Thursday = 4,
    /// Index 5.
    Friday = 5,
    /// Index 6.
    Saturday = 6,
}

impl Weekday {
    /// All weekdays in index order.
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Looks up a weekday by its endpoint index.
    #[must_use]
    pub const fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::Sunday),
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            _ => None,
        }
    }

    /// Returns the endpoint index of this weekday.
    #[must_use]
    pub const fn index(self) -> i64 {
        self as i64
    }

    /// Full display name, e.g. `"Sunday"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }

    /// Three-letter display name, e.g. `"Sun"`.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Sunday => "Sun",
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
        }
    }

    #[must_use]
    pub const fn day_type(self) -> DayType {
        match self {
            Self::Sunday | Self::Saturday => DayType::Weekend,
            Self::Monday | Self::Tuesday | Self::Wednesday | Self::Thursday | Self::Friday => {
                DayType::Weekday
            }
        }
    }

    #[must_use]
    pub const fn is_weekend(self) -> bool {
        matches!(self.day_type(), DayType::Weekend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_index_roundtrip() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_index(day.index()), Some(day));
        }
        assert_eq!(Weekday::from_index(-1), None);
        assert_eq!(Weekday::from_index(7), None);
    }

    #[test]
    fn only_sunday_and_saturday_are_weekend() {
        let weekend: Vec<Weekday> = Weekday::ALL
            .into_iter()
            .filter(|d| d.is_weekend())
            .collect();
        assert_eq!(weekend, vec![Weekday::Sunday, Weekday::Saturday]);
    }

    #[test]
    fn short_names_are_prefixes() {
        for day in Weekday::ALL {
            assert!(
                day.name().starts_with(day.short_name()),
                "{day:?} short name {} is not a prefix of {}",
                day.short_name(),
                day.name()
            );
        }
    }

    #[test]
    fn bucket_kind_ranges() {
        assert!(BucketKind::Hour.contains(0));
        assert!(BucketKind::Hour.contains(23));
        assert!(!BucketKind::Hour.contains(24));
        assert!(!BucketKind::Day.contains(0));
        assert!(BucketKind::Day.contains(31));
        assert!(!BucketKind::Weekday.contains(7));
    }

    #[test]
    fn bucket_keys_sort_numerically_before_labels() {
        let mut keys = vec![
            BucketKey::Label("late".to_string()),
            BucketKey::Index(10),
            BucketKey::Index(2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                BucketKey::Index(2),
                BucketKey::Index(10),
                BucketKey::Label("late".to_string()),
            ]
        );
    }

    #[test]
    fn geo_point_rejects_invalid_coordinates() {
        assert!(GeoPoint::new(40.7, -73.9).is_some());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_none());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_none());
        assert!(GeoPoint::new(91.0, 0.0).is_none());
        assert!(GeoPoint::new(0.0, -180.5).is_none());
    }

    #[test]
    fn negative_zero_shares_coordinate_key() {
        let a = GeoPoint::new(0.0, 10.0).unwrap();
        let b = GeoPoint::new(-0.0, 10.0).unwrap();
        assert_eq!(a.coordinate_key(), b.coordinate_key());
    }

    #[test]
    fn cluster_assignment_uses_backend_field_names() {
        let json = serde_json::json!({"Lat": 40.75, "Lon": -73.98, "cluster": 3});
        let parsed: ClusterAssignment = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.cluster, 3);
        assert!((parsed.point.lat - 40.75).abs() < 1e-9);
    }

    #[test]
    fn summary_invariants() {
        let ok = SummaryStats {
            total_rides: 100,
            avg_rides_per_day: 20,
            min_rides_per_day: 10,
            max_rides_per_day: 30,
        };
        assert!(ok.validate().is_ok());

        let bad = SummaryStats {
            max_rides_per_day: 200,
            ..ok
        };
        assert_eq!(
            bad.validate(),
            Err(SummaryInvariantError::MaxAboveTotal {
                max: 200,
                total: 100
            })
        );

        let bad = SummaryStats {
            min_rides_per_day: 25,
            ..ok
        };
        assert!(matches!(
            bad.validate(),
            Err(SummaryInvariantError::MinAboveAverage { .. })
        ));
    }
}
