//! `GeoJSON` export of the map panels.
//!
//! Positions are `[lon, lat]`. The marker or heat layer style travels as a
//! `style` foreign member of the collection so map clients can apply it.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use ride_insights_panel::pipeline::{ClusterView, HeatmapView};
use serde::Serialize;

fn point(lat: f64, lon: f64, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>, style: &impl Serialize) -> FeatureCollection {
    let foreign_members = serde_json::to_value(style)
        .ok()
        .map(|style| JsonObject::from_iter([("style".to_string(), style)]));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members,
    }
}

/// One point feature per pickup with its cluster ID and marker color.
#[must_use]
pub fn clusters(view: &ClusterView) -> FeatureCollection {
    let features = view
        .points
        .iter()
        .map(|p| {
            let mut properties = JsonObject::new();
            properties.insert("cluster".to_string(), JsonValue::from(p.assignment.cluster));
            properties.insert("color".to_string(), JsonValue::from(p.color.hex));
            properties.insert("colorName".to_string(), JsonValue::from(p.color.name));
            point(p.assignment.point.lat, p.assignment.point.lon, properties)
        })
        .collect();

    collection(features, &view.style)
}

/// One point feature per heatmap cell with its intensity.
#[must_use]
pub fn heatmap(view: &HeatmapView) -> FeatureCollection {
    let features = view
        .cells
        .iter()
        .map(|cell| {
            let mut properties = JsonObject::new();
            properties.insert("intensity".to_string(), JsonValue::from(cell.intensity));
            point(cell.lat, cell.lon, properties)
        })
        .collect();

    collection(features, &view.style)
}

#[cfg(test)]
mod tests {
    use ride_insights_panel::PanelPipeline;
    use ride_insights_panel::pipeline::{ClusterPipeline, HeatmapPipeline};
    use serde_json::json;

    use super::*;

    fn coordinates(feature: &Feature) -> Vec<f64> {
        match &feature.geometry.as_ref().unwrap().value {
            Value::Point(position) => position.clone(),
            other => panic!("expected a point, got {other:?}"),
        }
    }

    #[test]
    fn cluster_features_carry_color_and_lon_lat_order() {
        let view = ClusterPipeline::default()
            .derive(&json!([
                {"Lat": 40.7, "Lon": -73.9, "cluster": 6},
                {"Lat": 40.8, "Lon": -73.8, "cluster": 0}
            ]))
            .unwrap();
        let collection = clusters(&view);

        assert_eq!(collection.features.len(), 2);
        let first = &collection.features[0];
        assert_eq!(coordinates(first), vec![-73.9, 40.7]);
        assert_eq!(first.property("cluster"), Some(&json!(6)));
        assert_eq!(first.property("colorName"), Some(&json!("blue")));

        let members = collection.foreign_members.as_ref().unwrap();
        assert_eq!(members["style"]["radius"], 4);
    }

    #[test]
    fn heatmap_features_carry_intensity() {
        let view = HeatmapPipeline
            .derive(&json!([
                {"Lat": 1.0, "Lon": 1.0},
                {"Lat": 1.0, "Lon": 1.0},
                {"Lat": 2.0, "Lon": 2.0}
            ]))
            .unwrap();
        let collection = heatmap(&view);

        assert_eq!(collection.features.len(), 2);
        assert_eq!(collection.features[0].property("intensity"), Some(&json!(1.0)));
        assert_eq!(collection.features[1].property("intensity"), Some(&json!(0.5)));
        assert_eq!(coordinates(&collection.features[1]), vec![2.0, 2.0]);

        let text = serde_json::to_string(&collection).unwrap();
        assert!(text.contains("\"FeatureCollection\""), "{text}");
        assert!(text.contains("\"blur\":25"), "{text}");
    }
}
