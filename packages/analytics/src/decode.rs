//! Record-level decoding of raw endpoint payloads.
//!
//! Each decoder walks a JSON array and keeps only well-formed records.
//! Anything else (missing `ride_count`, negative counts, out-of-range
//! buckets, non-finite or out-of-range coordinates) is skipped and
//! counted in [`Decoded::dropped`], with a single warning per payload.

use ride_insights_analytics_models::Decoded;
use ride_insights_ride_models::{
    BucketKey, BucketKind, ClusterAssignment, GeoPoint, SummaryStats, TimeBucketRecord,
};
use serde_json::Value;

use crate::AnalyticsError;

/// Decodes a `[{<hour|day|weekday>, ride_count}]` payload.
///
/// The bucket is read from the field named by [`BucketKind::field_name`],
/// falling back to a generic `bucket` field. Numeric buckets must lie in
/// the kind's range. Hour and day buckets may also be string labels;
/// weekday buckets must be numeric.
///
/// # Errors
///
/// Returns [`AnalyticsError::MalformedPayload`] if the payload is not an
/// array.
pub fn decode_buckets(
    payload: &Value,
    kind: BucketKind,
) -> Result<Decoded<TimeBucketRecord>, AnalyticsError> {
    decode_array(payload, kind.as_ref(), |item| decode_bucket(item, kind))
}

fn decode_bucket(item: &Value, kind: BucketKind) -> Option<TimeBucketRecord> {
    let raw = item.get(kind.field_name()).or_else(|| item.get("bucket"))?;

    let bucket = if let Some(index) = raw.as_i64() {
        if !kind.contains(index) {
            return None;
        }
        BucketKey::Index(index)
    } else if let Some(label) = raw.as_str()
        && kind != BucketKind::Weekday
        && !label.is_empty()
    {
        BucketKey::Label(label.to_string())
    } else {
        return None;
    };

    let ride_count = item.get("ride_count")?.as_u64()?;

    Some(TimeBucketRecord { bucket, ride_count })
}

/// Decodes a `[{Lat, Lon}]` payload.
///
/// # Errors
///
/// Returns [`AnalyticsError::MalformedPayload`] if the payload is not an
/// array.
pub fn decode_points(payload: &Value) -> Result<Decoded<GeoPoint>, AnalyticsError> {
    decode_array(payload, "heatmap", decode_point)
}

/// Decodes a `[{Lat, Lon, cluster}]` payload.
///
/// # Errors
///
/// Returns [`AnalyticsError::MalformedPayload`] if the payload is not an
/// array.
pub fn decode_cluster_assignments(
    payload: &Value,
) -> Result<Decoded<ClusterAssignment>, AnalyticsError> {
    decode_array(payload, "clusters", |item| {
        let point = decode_point(item)?;
        let cluster = item.get("cluster")?.as_u64()?;
        Some(ClusterAssignment { point, cluster })
    })
}

fn decode_point(item: &Value) -> Option<GeoPoint> {
    let lat = item.get("Lat").or_else(|| item.get("lat"))?.as_f64()?;
    let lon = item.get("Lon").or_else(|| item.get("lon"))?.as_f64()?;
    GeoPoint::new(lat, lon)
}

/// Decodes the summary object.
///
/// `avg_rides_per_day` arrives as a float with two decimals and is
/// rounded to the nearest integer.
///
/// # Errors
///
/// Returns [`AnalyticsError::MalformedPayload`] if the payload is not an
/// object, a field is missing or negative, or the statistics are
/// inconsistent (see [`SummaryStats::validate`]).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn decode_summary(payload: &Value) -> Result<SummaryStats, AnalyticsError> {
    if !payload.is_object() {
        return Err(AnalyticsError::MalformedPayload {
            message: format!("summary payload is {}, expected an object", kind_of(payload)),
        });
    }

    let count_field = |name: &str| {
        payload[name]
            .as_u64()
            .ok_or_else(|| AnalyticsError::MalformedPayload {
                message: format!("summary field '{name}' is missing or not a non-negative integer"),
            })
    };

    let avg = payload["avg_rides_per_day"]
        .as_f64()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| AnalyticsError::MalformedPayload {
            message: "summary field 'avg_rides_per_day' is missing or not a non-negative number"
                .to_string(),
        })?;

    let stats = SummaryStats {
        total_rides: count_field("total_rides")?,
        avg_rides_per_day: avg.round() as u64,
        min_rides_per_day: count_field("min_rides_per_day")?,
        max_rides_per_day: count_field("max_rides_per_day")?,
    };

    stats
        .validate()
        .map_err(|e| AnalyticsError::MalformedPayload {
            message: format!("inconsistent summary: {e}"),
        })?;

    Ok(stats)
}

fn decode_array<T>(
    payload: &Value,
    label: &str,
    mut decode_item: impl FnMut(&Value) -> Option<T>,
) -> Result<Decoded<T>, AnalyticsError> {
    let items = payload
        .as_array()
        .ok_or_else(|| AnalyticsError::MalformedPayload {
            message: format!("{label} payload is {}, expected an array", kind_of(payload)),
        })?;

    let mut records = Vec::with_capacity(items.len());
    let mut dropped = 0;

    for item in items {
        match decode_item(item) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::warn!(
            "[{label}] Dropped {dropped} malformed record(s) of {}",
            items.len()
        );
    }

    Ok(Decoded { records, dropped })
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
