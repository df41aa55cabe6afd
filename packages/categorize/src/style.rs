//! Fixed rendering parameters for chart and map renderers.

use serde::Serialize;

/// A map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Initial centre latitude.
    pub center_lat: f64,
    /// Initial centre longitude.
    pub center_lon: f64,
    /// Initial zoom level.
    pub zoom: u8,
}

/// Parameters for the pickup density heat layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatLayerStyle {
    /// Point radius in pixels.
    pub radius: u32,
    /// Blur radius in pixels.
    pub blur: u32,
    /// Zoom at which points reach full intensity.
    pub max_zoom: u8,
    pub viewport: Viewport,
}

pub const HEAT_LAYER: HeatLayerStyle = HeatLayerStyle {
    radius: 15,
    blur: 25,
    max_zoom: 17,
    viewport: Viewport {
        center_lat: 40.75,
        center_lon: -73.98,
        zoom: 12,
    },
};

/// Parameters for cluster circle markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMarkerStyle {
    /// Marker radius in pixels.
    pub radius: u32,
    /// Fill opacity, 0-1.
    pub fill_opacity: f64,
    pub viewport: Viewport,
}

pub const CLUSTER_MARKERS: ClusterMarkerStyle = ClusterMarkerStyle {
    radius: 4,
    fill_opacity: 0.7,
    viewport: Viewport {
        center_lat: 40.73,
        center_lon: -73.93,
        zoom: 11,
    },
};

/// Default bar fill for distribution charts that are not banded.
pub const BAR_FILL: &str = "#4f46e5";
