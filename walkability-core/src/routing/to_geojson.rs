use geo::line_string;
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::{Map, Value as JsonValue, json};

use super::{RouteLeg, RouteResult};
use crate::model::PointSet;

impl RouteResult {
    /// Converts the route to a `GeoJSON` `FeatureCollection`: one point
    /// feature per stop followed by one straight line feature per leg.
    ///
    /// Unreachable durations and distances are written as `null`.
    pub fn to_geojson(&self, points: &PointSet) -> FeatureCollection {
        let mut features = Vec::with_capacity(self.stops.len() + self.legs.len());

        for (order, stop) in self.stops.iter().enumerate() {
            let Some(point) = points.get(stop.index) else {
                continue;
            };
            let mut properties = Map::new();
            properties.insert("kind".to_string(), json!("stop"));
            properties.insert("order".to_string(), json!(order));
            properties.insert("index".to_string(), json!(stop.index));
            properties.insert("name".to_string(), json!(point.name));
            properties.insert("category".to_string(), json!(stop.category));

            features.push(feature(Geometry::new((&point.geometry).into()), properties));
        }

        for (order, leg) in self.legs.iter().enumerate() {
            if let Some(feature) = leg_to_feature(points, leg, order) {
                features.push(feature);
            }
        }

        FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        }
    }

    pub fn to_geojson_string(&self, points: &PointSet) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_geojson(points))
    }
}

fn leg_to_feature(points: &PointSet, leg: &RouteLeg, order: usize) -> Option<Feature> {
    let from = points.get(leg.from)?;
    let to = points.get(leg.to)?;

    let line = line_string![
        (x: from.geometry.x(), y: from.geometry.y()),
        (x: to.geometry.x(), y: to.geometry.y()),
    ];

    let mut properties = Map::new();
    properties.insert("kind".to_string(), json!("leg"));
    properties.insert("order".to_string(), json!(order));
    properties.insert("from_name".to_string(), json!(from.name));
    properties.insert("to_name".to_string(), json!(to.name));
    properties.insert("duration".to_string(), finite_or_null(leg.duration));
    properties.insert("distance".to_string(), finite_or_null(leg.distance));

    Some(feature(Geometry::new((&line).into()), properties))
}

fn feature(geometry: Geometry, properties: Map<String, JsonValue>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn finite_or_null(value: f64) -> JsonValue {
    if value.is_finite() {
        json!(value)
    } else {
        JsonValue::Null
    }
}
