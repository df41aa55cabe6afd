//! Heatmap intensity normalization.
//!
//! Points sharing an exact coordinate pair are grouped, and each group's
//! size is divided by the largest group size in the same dataset. The
//! result is relative to the current fetch only.

use std::collections::HashMap;

use ride_insights_ride_models::{GeoPoint, HeatmapCell};

/// Groups points by exact `(lat, lon)` and emits one cell per group, in
/// order of first appearance.
///
/// The densest cell always has intensity `1.0`. Empty input yields an
/// empty vector.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn normalize<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Vec<HeatmapCell> {
    let mut index: HashMap<(u64, u64), usize> = HashMap::new();
    let mut groups: Vec<(GeoPoint, u64)> = Vec::new();

    for point in points {
        match index.get(&point.coordinate_key()) {
            Some(&i) => groups[i].1 += 1,
            None => {
                index.insert(point.coordinate_key(), groups.len());
                groups.push((*point, 1));
            }
        }
    }

    let Some(max_count) = groups.iter().map(|(_, count)| *count).max() else {
        return Vec::new();
    };

    groups
        .into_iter()
        .map(|(point, count)| HeatmapCell {
            lat: point.lat + 0.0,
            lon: point.lon + 0.0,
            intensity: count as f64 / max_count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use ride_insights_ride_models::ClusterAssignment;

    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn cluster_example() {
        let input = [
            ClusterAssignment {
                point: point(1.0, 1.0),
                cluster: 0,
            },
            ClusterAssignment {
                point: point(1.0, 1.0),
                cluster: 0,
            },
            ClusterAssignment {
                point: point(2.0, 2.0),
                cluster: 1,
            },
        ];
        let cells = normalize(input.iter().map(|a| &a.point));
        assert_eq!(
            cells,
            vec![
                HeatmapCell {
                    lat: 1.0,
                    lon: 1.0,
                    intensity: 1.0
                },
                HeatmapCell {
                    lat: 2.0,
                    lon: 2.0,
                    intensity: 0.5
                },
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_cells() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn one_cell_per_distinct_coordinate_and_max_is_one() {
        let points = [
            point(40.7, -73.9),
            point(40.7, -73.9),
            point(40.7, -73.91),
            point(40.71, -73.9),
            point(40.7, -73.9),
            point(40.71, -73.9),
        ];
        let cells = normalize(&points);

        let distinct: BTreeSet<(u64, u64)> = points.iter().map(GeoPoint::coordinate_key).collect();
        assert_eq!(cells.len(), distinct.len());

        let max = cells.iter().map(|c| c.intensity).fold(0.0_f64, f64::max);
        assert!((max - 1.0).abs() < f64::EPSILON);
        assert!(cells.iter().all(|c| c.intensity > 0.0 && c.intensity <= 1.0));
    }

    #[test]
    fn uniform_points_all_have_full_intensity() {
        let cells = normalize(&[point(1.0, 2.0), point(3.0, 4.0)]);
        assert!(cells.iter().all(|c| (c.intensity - 1.0).abs() < f64::EPSILON));
    }

    #[test]
    fn signed_zero_is_one_coordinate() {
        let cells = normalize(&[point(0.0, 5.0), point(-0.0, 5.0)]);
        assert_eq!(cells.len(), 1);
        assert!(cells[0].lat.is_sign_positive());
    }
}
