//! The six analytics panels, mounted side by side.

use std::collections::BTreeMap;

use ride_insights_source::RideSource;

use crate::pipeline::{
    ClusterPipeline, DistributionPipeline, HeatmapPipeline, SummaryPipeline,
};
use crate::{PanelController, PanelKind, PanelStatus};

/// Independent controllers for every panel.
///
/// Panels share nothing but the source: one panel failing, loading slowly,
/// or being refreshed never affects another.
pub struct Dashboard {
    pub hourly: PanelController<DistributionPipeline>,
    pub daily: PanelController<DistributionPipeline>,
    pub weekday: PanelController<DistributionPipeline>,
    pub summary: PanelController<SummaryPipeline>,
    pub clusters: PanelController<ClusterPipeline>,
    pub heatmap: PanelController<HeatmapPipeline>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            hourly: PanelController::new(DistributionPipeline::hourly()),
            daily: PanelController::new(DistributionPipeline::daily()),
            weekday: PanelController::new(DistributionPipeline::weekday()),
            summary: PanelController::new(SummaryPipeline),
            clusters: PanelController::new(ClusterPipeline::default()),
            heatmap: PanelController::new(HeatmapPipeline),
        }
    }

    /// Mounts every panel concurrently.
    pub async fn mount_all(&self, source: &dyn RideSource) {
        log::debug!("[dashboard] Mounting {} panels", PanelKind::ALL.len());
        futures::join!(
            self.hourly.mount(source),
            self.daily.mount(source),
            self.weekday.mount(source),
            self.summary.mount(source),
            self.clusters.mount(source),
            self.heatmap.mount(source),
        );
    }

    /// Refreshes every panel concurrently.
    pub async fn refresh_all(&self, source: &dyn RideSource) {
        futures::join!(
            self.hourly.refresh(source),
            self.daily.refresh(source),
            self.weekday.refresh(source),
            self.summary.refresh(source),
            self.clusters.refresh(source),
            self.heatmap.refresh(source),
        );
    }

    /// Tears down every panel; pending responses are discarded.
    pub fn teardown_all(&self) {
        self.hourly.teardown();
        self.daily.teardown();
        self.weekday.teardown();
        self.summary.teardown();
        self.clusters.teardown();
        self.heatmap.teardown();
    }

    #[must_use]
    pub fn statuses(&self) -> BTreeMap<PanelKind, PanelStatus> {
        BTreeMap::from([
            (PanelKind::Hourly, self.hourly.status()),
            (PanelKind::Daily, self.daily.status()),
            (PanelKind::Weekday, self.weekday.status()),
            (PanelKind::Summary, self.summary.status()),
            (PanelKind::Clusters, self.clusters.status()),
            (PanelKind::Heatmap, self.heatmap.status()),
        ])
    }
}
