//! Payload-to-view transforms, one per panel kind.
//!
//! A [`PanelPipeline`] is the synchronous half of a panel refresh: given
//! the raw payload of its endpoint it decodes, aggregates and categorizes
//! it into a view. Pipelines hold no state between calls.

use ride_insights_analytics::{AnalyticsError, clusters, decode, distribution, heatmap};
use ride_insights_analytics_models::{
    ClusterSummary, DistributionSummary, RankedBucket, WeekdaySplit,
};
use ride_insights_categorize::style::{
    CLUSTER_MARKERS, ClusterMarkerStyle, HEAT_LAYER, HeatLayerStyle,
};
use ride_insights_categorize::{Band, Palette, PaletteColor, bucket_band};
use ride_insights_ride_models::{
    BucketKey, BucketKind, ClusterAssignment, HeatmapCell, SummaryStats, TimeBucketRecord, Weekday,
};
use ride_insights_source::RawPayload;
use serde::Serialize;

use crate::PanelKind;

/// Derives a panel's view from its endpoint's payload.
pub trait PanelPipeline: Send + Sync {
    /// The derived view the panel displays.
    type View: Send + Sync + 'static;

    fn kind(&self) -> PanelKind;

    /// Derives the view.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if the payload's overall shape is
    /// unusable. Individual malformed records are dropped, not errors.
    fn derive(&self, payload: &RawPayload) -> Result<Self::View, AnalyticsError>;
}

/// One bar of a distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketRow {
    pub record: TimeBucketRecord,
    /// Axis label, e.g. `"08:00"`, `"14"` or `"Sunday"`.
    pub label: String,
    pub band: Band,
    /// Share of the panel total, 0-100.
    pub percent_of_total: f64,
}

/// View for the hourly, daily and weekday panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionView {
    pub kind: BucketKind,
    /// Rows in display order. Weekday rows are always Sunday first.
    pub rows: Vec<BucketRow>,
    pub summary: DistributionSummary,
    pub ranking: Vec<RankedBucket>,
    /// Present only for the weekday panel.
    pub weekday_split: Option<WeekdaySplit>,
    pub dropped_records: usize,
}

/// Pipeline for the three bucketed distribution panels.
#[derive(Debug, Clone, Copy)]
pub struct DistributionPipeline {
    kind: BucketKind,
}

impl DistributionPipeline {
    #[must_use]
    pub const fn hourly() -> Self {
        Self {
            kind: BucketKind::Hour,
        }
    }

    #[must_use]
    pub const fn daily() -> Self {
        Self {
            kind: BucketKind::Day,
        }
    }

    #[must_use]
    pub const fn weekday() -> Self {
        Self {
            kind: BucketKind::Weekday,
        }
    }
}

impl PanelPipeline for DistributionPipeline {
    type View = DistributionView;

    fn kind(&self) -> PanelKind {
        match self.kind {
            BucketKind::Hour => PanelKind::Hourly,
            BucketKind::Day => PanelKind::Daily,
            BucketKind::Weekday => PanelKind::Weekday,
        }
    }

    fn derive(&self, payload: &RawPayload) -> Result<DistributionView, AnalyticsError> {
        let decoded = decode::decode_buckets(payload, self.kind)?;

        // Peak ties resolve by input order, so summarize before sorting.
        let summary = distribution::summarize(&decoded.records)?;
        let ranking = distribution::rank(&decoded.records)?;

        let (records, weekday_split) = if self.kind == BucketKind::Weekday {
            let split = distribution::weekday_split(&decoded.records)?;
            (distribution::sorted_by_bucket(decoded.records), Some(split))
        } else {
            (decoded.records, None)
        };

        let max = summary.max_count();
        let rows = records
            .into_iter()
            .map(|record| BucketRow {
                label: bucket_label(&record.bucket, self.kind),
                band: bucket_band(&record, self.kind, max),
                percent_of_total: ride_insights_analytics::percent_of(
                    record.ride_count,
                    summary.total,
                ),
                record,
            })
            .collect();

        Ok(DistributionView {
            kind: self.kind,
            rows,
            summary,
            ranking,
            weekday_split,
            dropped_records: decoded.dropped,
        })
    }
}

fn bucket_label(bucket: &BucketKey, kind: BucketKind) -> String {
    match (bucket, kind) {
        (BucketKey::Index(hour), BucketKind::Hour) => format!("{hour:02}:00"),
        (BucketKey::Index(index), BucketKind::Weekday) => Weekday::from_index(*index)
            .map_or_else(|| index.to_string(), |day| day.name().to_string()),
        (key, _) => key.to_string(),
    }
}

/// View for the summary panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub stats: SummaryStats,
    /// `max_rides_per_day - min_rides_per_day`.
    pub spread: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryPipeline;

impl PanelPipeline for SummaryPipeline {
    type View = SummaryView;

    fn kind(&self) -> PanelKind {
        PanelKind::Summary
    }

    fn derive(&self, payload: &RawPayload) -> Result<SummaryView, AnalyticsError> {
        let stats = decode::decode_summary(payload)?;
        Ok(SummaryView {
            spread: stats.max_rides_per_day - stats.min_rides_per_day,
            stats,
        })
    }
}

/// A cluster-labelled pickup with its marker color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClusterPoint {
    #[serde(flatten)]
    pub assignment: ClusterAssignment,
    pub color: PaletteColor,
}

/// View for the cluster map panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterView {
    pub points: Vec<ClusterPoint>,
    pub summary: ClusterSummary,
    pub style: ClusterMarkerStyle,
    pub dropped_records: usize,
}

/// Pipeline for the cluster map; colors come from a fixed palette.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterPipeline {
    palette: Palette<'static>,
}

impl ClusterPipeline {
    #[must_use]
    pub const fn with_palette(palette: Palette<'static>) -> Self {
        Self { palette }
    }
}

impl PanelPipeline for ClusterPipeline {
    type View = ClusterView;

    fn kind(&self) -> PanelKind {
        PanelKind::Clusters
    }

    fn derive(&self, payload: &RawPayload) -> Result<ClusterView, AnalyticsError> {
        let decoded = decode::decode_cluster_assignments(payload)?;
        let summary = clusters::summarize(&decoded.records);
        let points = decoded
            .records
            .into_iter()
            .map(|assignment| ClusterPoint {
                color: self.palette.color_for(assignment.cluster),
                assignment,
            })
            .collect();

        Ok(ClusterView {
            points,
            summary,
            style: CLUSTER_MARKERS,
            dropped_records: decoded.dropped,
        })
    }
}

/// View for the density heatmap panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapView {
    pub cells: Vec<HeatmapCell>,
    /// Number of valid points the cells were built from.
    pub point_count: usize,
    pub style: HeatLayerStyle,
    pub dropped_records: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeatmapPipeline;

impl PanelPipeline for HeatmapPipeline {
    type View = HeatmapView;

    fn kind(&self) -> PanelKind {
        PanelKind::Heatmap
    }

    fn derive(&self, payload: &RawPayload) -> Result<HeatmapView, AnalyticsError> {
        let decoded = decode::decode_points(payload)?;
        Ok(HeatmapView {
            cells: heatmap::normalize(&decoded.records),
            point_count: decoded.records.len(),
            style: HEAT_LAYER,
            dropped_records: decoded.dropped,
        })
    }
}
