//! Plain-text rendering of panel views.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use geojson::FeatureCollection;
use ride_insights_categorize::PaletteColor;
use ride_insights_panel::{PanelKind, PanelViewState};
use ride_insights_panel::pipeline::{ClusterView, DistributionView, HeatmapView, SummaryView};
use ride_insights_ride_models::TimeBucketRecord;

use crate::export;

/// Width of a full-height bar, in characters.
const BAR_WIDTH: u64 = 40;

/// Ranked buckets listed under a distribution.
const TOP_BUCKETS: usize = 3;

/// Heatmap cells listed, densest first.
const TOP_CELLS: usize = 5;

/// A view that can be printed to the terminal.
pub trait RenderView {
    /// Body text, one or more indented lines ending in `\n`.
    fn text(&self) -> String;

    /// The view as map features, for map panels.
    fn feature_collection(&self) -> Option<FeatureCollection> {
        None
    }
}

/// Renders a settled panel: heading, then the view, failure, or a
/// placeholder.
pub fn panel_text<T: RenderView>(
    kind: PanelKind,
    state: &PanelViewState<T>,
    retries: u32,
) -> String {
    let mut out = format!("== {} ==\n", kind.title());

    if let Some(failure) = state.failure() {
        writeln!(out, "  error ({}): {}", failure.kind, failure.message).ok();
        if retries == 0 {
            out.push_str("  run again with --retries <n> to retry automatically\n");
        } else {
            writeln!(out, "  gave up after {retries} retries").ok();
        }
        return out;
    }

    let Some(loaded) = state.loaded() else {
        writeln!(out, "  {}", state.status()).ok();
        return out;
    };

    out.push_str(&loaded.view.text());
    if state.is_stale() {
        out.push_str("  (stale, refresh in progress)\n");
    }
    writeln!(
        out,
        "  updated {}",
        loaded.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ).ok();
    out
}

fn bar(count: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = count.saturating_mul(BAR_WIDTH) / max;
    "#".repeat(usize::try_from(filled).unwrap_or(0))
}

/// Display label of the row holding `record`'s bucket.
fn label_of(view: &DistributionView, record: &TimeBucketRecord) -> String {
    view.rows
        .iter()
        .find(|row| row.record.bucket == record.bucket)
        .map_or_else(|| record.bucket.to_string(), |row| row.label.clone())
}

impl RenderView for DistributionView {
    fn text(&self) -> String {
        let mut out = String::new();
        let max = self.summary.max_count();
        let width = self.rows.iter().map(|row| row.label.len()).max().unwrap_or(0);

        for row in &self.rows {
            writeln!(
                out,
                "  {:>width$} {:<40} {:>7} {:>5.1}%  {}",
                row.label,
                bar(row.record.ride_count, max),
                row.record.ride_count,
                row.percent_of_total,
                row.band,
            ).ok();
        }

        write!(
            out,
            "  total {} | average {}",
            self.summary.total, self.summary.average
        ).ok();
        if let Some(peak) = &self.summary.peak {
            write!(out, " | peak {} ({})", label_of(self, peak), peak.ride_count).ok();
        }
        if let Some(trough) = &self.summary.trough {
            write!(
                out,
                " | quietest {} ({})",
                label_of(self, trough),
                trough.ride_count
            ).ok();
        }
        writeln!(
            out,
            " | {}/{} active",
            self.summary.active_buckets, self.summary.bucket_count
        ).ok();

        if !self.ranking.is_empty() {
            let top: Vec<String> = self
                .ranking
                .iter()
                .take(TOP_BUCKETS)
                .map(|ranked| {
                    format!(
                        "{}. {} ({:.1}%)",
                        ranked.rank,
                        label_of(self, &ranked.record),
                        ranked.percent_of_total
                    )
                })
                .collect();
            writeln!(out, "  busiest: {}", top.join(", ")).ok();
        }

        if let Some(split) = &self.weekday_split {
            writeln!(
                out,
                "  weekend {} ({:.1}%) | weekdays {} ({:.1}%)",
                split.weekend_total,
                split.weekend_percent,
                split.weekday_total,
                split.weekday_percent
            ).ok();
        }

        dropped_line(&mut out, self.dropped_records);
        out
    }
}

impl RenderView for SummaryView {
    fn text(&self) -> String {
        let stats = &self.stats;
        format!(
            "  total rides   {:>10}\n  avg per day   {:>10}\n  busiest day   {:>10}\n  quietest day  {:>10}\n  spread        {:>10}\n",
            stats.total_rides,
            stats.avg_rides_per_day,
            stats.max_rides_per_day,
            stats.min_rides_per_day,
            self.spread,
        )
    }
}

impl RenderView for ClusterView {
    fn text(&self) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "  {} points in {} clusters",
            self.summary.total_points, self.summary.unique_clusters
        ).ok();

        let colors: BTreeMap<u64, PaletteColor> = self
            .points
            .iter()
            .map(|point| (point.assignment.cluster, point.color))
            .collect();
        for (cluster, count) in &self.summary.points_per_cluster {
            let (name, hex) = colors
                .get(cluster)
                .map_or(("?", "?"), |color| (color.name, color.hex));
            writeln!(out, "  cluster {cluster:>3} {count:>7} points  {name} {hex}").ok();
        }

        writeln!(
            out,
            "  markers: radius {}px, opacity {} | centre {:.2}, {:.2} zoom {}",
            self.style.radius,
            self.style.fill_opacity,
            self.style.viewport.center_lat,
            self.style.viewport.center_lon,
            self.style.viewport.zoom
        ).ok();
        dropped_line(&mut out, self.dropped_records);
        out
    }

    fn feature_collection(&self) -> Option<FeatureCollection> {
        Some(export::clusters(self))
    }
}

impl RenderView for HeatmapView {
    fn text(&self) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "  {} points in {} cells",
            self.point_count,
            self.cells.len()
        ).ok();

        let mut densest: Vec<_> = self.cells.iter().collect();
        densest.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));
        for cell in densest.into_iter().take(TOP_CELLS) {
            writeln!(
                out,
                "  {:>10.5}, {:>11.5}  {:.2}",
                cell.lat, cell.lon, cell.intensity
            ).ok();
        }

        writeln!(
            out,
            "  heat layer: radius {}, blur {}, max zoom {} | centre {:.2}, {:.2} zoom {}",
            self.style.radius,
            self.style.blur,
            self.style.max_zoom,
            self.style.viewport.center_lat,
            self.style.viewport.center_lon,
            self.style.viewport.zoom
        ).ok();
        dropped_line(&mut out, self.dropped_records);
        out
    }

    fn feature_collection(&self) -> Option<FeatureCollection> {
        Some(export::heatmap(self))
    }
}

fn dropped_line(out: &mut String, dropped: usize) {
    if dropped > 0 {
        writeln!(out, "  {dropped} malformed records skipped").ok();
    }
}
