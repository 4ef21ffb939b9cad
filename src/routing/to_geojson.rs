use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::json;

use crate::model::RouteGraph;
use crate::routing::{RouteResult, tour::Tour};
use crate::NodeId;

fn hop_line(graph: &RouteGraph, hops: &[NodeId]) -> LineString<f64> {
    hops.iter()
        .filter_map(|&id| graph.node_by_id(id))
        .map(|node| (node.geometry.x(), node.geometry.y()))
        .collect()
}

fn line_feature(line: &LineString<f64>, properties: serde_json::Value) -> Feature {
    let value = json!({
        "type": "Feature",
        "geometry": Geometry::new(line.into()),
        "properties": properties,
    });
    serde_json::from_value(value).unwrap()
}

impl Tour {
    /// Renders the stitched tour as a `GeoJSON` feature collection: the hop
    /// path as a LineString plus one Point per visited waypoint.
    pub fn to_geojson(&self, graph: &RouteGraph) -> FeatureCollection {
        let mut features = vec![line_feature(
            &hop_line(graph, &self.path),
            json!({
                "total_cost": self.total_cost,
                "waypoints": self.waypoints,
            }),
        )];

        for (position, &id) in self.waypoints.iter().enumerate() {
            let Some(node) = graph.node_by_id(id) else {
                continue;
            };
            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new((&node.geometry).into()),
                "properties": {
                    "waypoint": id,
                    "position": position,
                }
            });
            features.push(serde_json::from_value(value).unwrap());
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

impl RouteResult {
    /// Renders a point-to-point route as a `GeoJSON` feature collection.
    pub fn to_geojson(&self, graph: &RouteGraph) -> FeatureCollection {
        let feature = line_feature(
            &hop_line(graph, &self.nodes),
            json!({
                "total_cost": self.total_cost,
                "hops": self.nodes.len(),
            }),
        );

        FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }
    }
}
