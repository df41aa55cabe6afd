//! Summaries of bucketed ride-count sequences (hourly, daily, weekday).

use ride_insights_analytics_models::{DistributionSummary, RankedBucket, WeekdaySplit};
use ride_insights_ride_models::{TimeBucketRecord, Weekday};

use crate::{AnalyticsError, percent_of};

/// Sum of all ride counts.
///
/// # Errors
///
/// Returns [`AnalyticsError::MalformedPayload`] if the sum does not fit in
/// a `u64`.
pub fn checked_total(records: &[TimeBucketRecord]) -> Result<u64, AnalyticsError> {
    records
        .iter()
        .try_fold(0_u64, |total, r| total.checked_add(r.ride_count))
        .ok_or_else(|| AnalyticsError::MalformedPayload {
            message: format!("ride counts of {} buckets overflow the total", records.len()),
        })
}

/// Computes total, rounded average, peak, trough and active bucket count.
///
/// The average divides by the number of buckets present, not by a fixed
/// calendar length. Ties for peak and trough go to the earliest record.
///
/// # Errors
///
/// Returns [`AnalyticsError::MalformedPayload`] if the total overflows.
pub fn summarize(records: &[TimeBucketRecord]) -> Result<DistributionSummary, AnalyticsError> {
    let total = checked_total(records)?;

    let mut peak: Option<&TimeBucketRecord> = None;
    let mut trough: Option<&TimeBucketRecord> = None;
    for record in records {
        if peak.is_none_or(|p| record.ride_count > p.ride_count) {
            peak = Some(record);
        }
        if trough.is_none_or(|t| record.ride_count < t.ride_count) {
            trough = Some(record);
        }
    }

    Ok(DistributionSummary {
        total,
        average: rounded_average(total, records.len()),
        peak: peak.cloned(),
        trough: trough.cloned(),
        active_buckets: records.iter().filter(|r| r.ride_count > 0).count(),
        bucket_count: records.len(),
    })
}

/// `round(total / count)`, halves rounded up. Zero when `count` is zero.
#[must_use]
pub fn rounded_average(total: u64, count: usize) -> u64 {
    let Ok(count) = u64::try_from(count) else {
        return 0;
    };
    if count == 0 {
        return 0;
    }
    total / count + u64::from(total % count * 2 >= count)
}

/// Returns the records ordered by bucket ascending.
///
/// Numeric buckets sort numerically and before any labelled buckets. The
/// sort is stable, so duplicate buckets keep their input order.
#[must_use]
pub fn sorted_by_bucket(mut records: Vec<TimeBucketRecord>) -> Vec<TimeBucketRecord> {
    records.sort_by(|a, b| a.bucket.cmp(&b.bucket));
    records
}

/// Ranks records by ride count, most rides first.
///
/// Equal counts keep their input order and receive consecutive ranks.
///
/// # Errors
///
/// Returns [`AnalyticsError::MalformedPayload`] if the total overflows.
pub fn rank(records: &[TimeBucketRecord]) -> Result<Vec<RankedBucket>, AnalyticsError> {
    let total = checked_total(records)?;
    let mut ordered: Vec<&TimeBucketRecord> = records.iter().collect();
    ordered.sort_by(|a, b| b.ride_count.cmp(&a.ride_count));

    Ok(ordered
        .into_iter()
        .enumerate()
        .map(|(i, record)| RankedBucket {
            rank: i + 1,
            record: record.clone(),
            percent_of_total: percent_of(record.ride_count, total),
        })
        .collect())
}

/// Splits weekday records into weekend (buckets 0 and 6) and weekday totals.
///
/// # Errors
///
/// Returns [`AnalyticsError::MalformedPayload`] if the total overflows.
pub fn weekday_split(records: &[TimeBucketRecord]) -> Result<WeekdaySplit, AnalyticsError> {
    let total = checked_total(records)?;
    let weekend_total: u64 = records
        .iter()
        .filter(|r| {
            r.bucket
                .index()
                .and_then(Weekday::from_index)
                .is_some_and(Weekday::is_weekend)
        })
        .map(|r| r.ride_count)
        .sum();
    let weekday_total = total - weekend_total;

    Ok(WeekdaySplit {
        weekend_total,
        weekday_total,
        weekend_percent: percent_of(weekend_total, total),
        weekday_percent: percent_of(weekday_total, total),
    })
}

#[cfg(test)]
mod tests {
    use ride_insights_ride_models::BucketKey;

    use super::*;

    fn records(counts: &[(i64, u64)]) -> Vec<TimeBucketRecord> {
        counts
            .iter()
            .map(|&(bucket, count)| TimeBucketRecord::new(bucket, count))
            .collect()
    }

    #[test]
    fn daily_example() {
        let summary = summarize(&records(&[(1, 10), (2, 30), (3, 0)])).unwrap();
        assert_eq!(summary.total, 40);
        assert_eq!(summary.average, 13);
        assert_eq!(summary.peak, Some(TimeBucketRecord::new(2, 30)));
        assert_eq!(summary.active_buckets, 2);
        assert_eq!(summary.bucket_count, 3);
    }

    #[test]
    fn peak_ties_go_to_first_occurrence() {
        let summary = summarize(&records(&[(5, 7), (3, 9), (8, 9), (1, 2), (4, 2)])).unwrap();
        assert_eq!(summary.peak, Some(TimeBucketRecord::new(3, 9)));
        assert_eq!(summary.trough, Some(TimeBucketRecord::new(1, 2)));
    }

    #[test]
    fn empty_sequence_summarizes_to_zero() {
        let summary = summarize(&[]).unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average, 0);
        assert_eq!(summary.peak, None);
        assert_eq!(summary.active_buckets, 0);
        assert_eq!(summary.max_count(), 0);
    }

    #[test]
    fn average_rounds_half_up() {
        assert_eq!(rounded_average(5, 2), 3);
        assert_eq!(rounded_average(7, 3), 2);
        assert_eq!(rounded_average(8, 3), 3);
        assert_eq!(rounded_average(0, 4), 0);
        assert_eq!(rounded_average(9, 0), 0);
    }

    #[test]
    fn average_lies_between_min_and_max() {
        let cases: [&[(i64, u64)]; 4] = [
            &[(0, 1)],
            &[(0, 1), (1, 2)],
            &[(0, 100), (1, 0), (2, 0), (3, 1)],
            &[(0, 3), (1, 3), (2, 4)],
        ];
        for case in cases {
            let s = summarize(&records(case)).unwrap();
            assert!(
                s.min_count() <= s.average && s.average <= s.max_count(),
                "{case:?}: min {} avg {} max {}",
                s.min_count(),
                s.average,
                s.max_count()
            );
        }
    }

    #[test]
    fn sorts_weekdays_regardless_of_input_order() {
        let sorted = sorted_by_bucket(records(&[(3, 1), (0, 2), (6, 3), (1, 4)]));
        let buckets: Vec<Option<i64>> = sorted.iter().map(|r| r.bucket.index()).collect();
        assert_eq!(buckets, vec![Some(0), Some(1), Some(3), Some(6)]);
    }

    #[test]
    fn labels_sort_after_indices() {
        let mut input = records(&[(2, 1)]);
        input.insert(
            0,
            TimeBucketRecord {
                bucket: BucketKey::Label("unknown".to_string()),
                ride_count: 1,
            },
        );
        let sorted = sorted_by_bucket(input);
        assert_eq!(sorted[0].bucket, BucketKey::Index(2));
    }

    #[test]
    fn rank_orders_descending_with_stable_ties() {
        let ranked = rank(&records(&[(0, 5), (1, 20), (2, 5), (3, 10)])).unwrap();
        let order: Vec<Option<i64>> = ranked.iter().map(|r| r.record.bucket.index()).collect();
        assert_eq!(order, vec![Some(1), Some(3), Some(0), Some(2)]);
        assert_eq!(ranked[0].rank, 1);
        assert!((ranked[0].percent_of_total - 50.0).abs() < 1e-9);
    }

    #[test]
    fn weekday_split_counts_sunday_and_saturday() {
        let split = weekday_split(&records(&[
            (0, 10),
            (1, 20),
            (2, 20),
            (3, 20),
            (4, 10),
            (5, 10),
            (6, 10),
        ]))
        .unwrap();
        assert_eq!(split.weekend_total, 20);
        assert_eq!(split.weekday_total, 80);
        assert!((split.weekend_percent - 20.0).abs() < 1e-9);
        assert!((split.weekday_percent - 80.0).abs() < 1e-9);
    }

    #[test]
    fn weekday_split_with_no_rides_reports_zero_percent() {
        let split = weekday_split(&records(&[(0, 0), (3, 0)])).unwrap();
        assert_eq!(split.weekend_total, 0);
        assert!(split.weekend_percent.abs() < f64::EPSILON);
        assert!(split.weekday_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn overflowing_total_is_malformed() {
        let input = records(&[(0, u64::MAX), (1, 1)]);
        assert!(matches!(
            summarize(&input),
            Err(AnalyticsError::MalformedPayload { .. })
        ));
        assert!(rank(&input).is_err());
        assert!(weekday_split(&input).is_err());
    }

    #[test]
    fn total_may_reach_u64_max() {
        let summary = summarize(&records(&[(0, u64::MAX - 1), (1, 1)])).unwrap();
        assert_eq!(summary.total, u64::MAX);
        assert_eq!(summary.peak, Some(TimeBucketRecord::new(0, u64::MAX - 1)));
    }
}
