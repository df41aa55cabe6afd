//! Per-cluster point counts.
//!
//! Cluster IDs are opaque labels; nothing assumes they form a contiguous
//! `0..k` range.

use ride_insights_analytics_models::ClusterSummary;
use ride_insights_ride_models::ClusterAssignment;

#[must_use]
pub fn summarize(assignments: &[ClusterAssignment]) -> ClusterSummary {
    let mut summary = ClusterSummary::default();
    for assignment in assignments {
        *summary
            .points_per_cluster
            .entry(assignment.cluster)
            .or_insert(0) += 1;
    }
    summary.unique_clusters = summary.points_per_cluster.len();
    summary.total_points = assignments.len();
    summary
}

#[cfg(test)]
mod tests {
    use ride_insights_ride_models::GeoPoint;

    use super::*;

    fn assignment(cluster: u64) -> ClusterAssignment {
        ClusterAssignment {
            point: GeoPoint::new(40.7, -73.9).unwrap(),
            cluster,
        }
    }

    #[test]
    fn counts_points_per_cluster() {
        let summary = summarize(&[assignment(0), assignment(0), assignment(1)]);
        assert_eq!(summary.unique_clusters, 2);
        assert_eq!(summary.points_per_cluster.get(&0), Some(&2));
        assert_eq!(summary.points_per_cluster.get(&1), Some(&1));
        assert_eq!(summary.total_points, 3);
    }

    #[test]
    fn non_contiguous_ids_are_fine() {
        let summary = summarize(&[assignment(42), assignment(7), assignment(1_000)]);
        assert_eq!(summary.unique_clusters, 3);
        let ids: Vec<u64> = summary.points_per_cluster.keys().copied().collect();
        assert_eq!(ids, vec![7, 42, 1_000]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(summarize(&[]), ClusterSummary::default());
    }
}
