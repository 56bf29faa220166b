//! This module is responsible for loading the campus data files exported by
//! the map editor (`nodes.json`, `edges.json`, `routes.json`) and building
//! a [`CampusMap`] for routing.

mod raw;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo::{LineString, Point};
use log::{info, warn};

use crate::error::Error;
use crate::model::{CampusMap, Edge, ManualRoute, Place};
use raw::{RawEdge, RawManualRoute, RawNode};

/// Loads the campus data files from `dir` and builds a [`CampusMap`].
///
/// `routes.json` is optional: a missing or unreadable file degrades to an
/// empty manual-route list with a warning, matching the behavior of the map
/// frontend.
///
/// # Errors
///
/// Returns an error when `nodes.json` or `edges.json` cannot be read or
/// parsed.
pub fn load_campus_map(dir: &Path) -> Result<CampusMap, Error> {
    let nodes: Vec<RawNode> = read_json(&dir.join("nodes.json"))?;
    let edges: Vec<RawEdge> = read_json(&dir.join("edges.json"))?;

    let routes_path = dir.join("routes.json");
    let routes: Vec<RawManualRoute> = if routes_path.exists() {
        read_json(&routes_path).unwrap_or_else(|err| {
            warn!(
                "failed to read {}: {err}; continuing without manual routes",
                routes_path.display()
            );
            Vec::new()
        })
    } else {
        warn!("no routes.json in {}; continuing without manual routes", dir.display());
        Vec::new()
    };

    info!(
        "loaded {} places, {} edges, {} manual routes",
        nodes.len(),
        edges.len(),
        routes.len()
    );

    Ok(build_campus_map(nodes, edges, routes))
}

fn build_campus_map(
    nodes: Vec<RawNode>,
    edges: Vec<RawEdge>,
    routes: Vec<RawManualRoute>,
) -> CampusMap {
    let places = nodes
        .into_iter()
        .map(|node| Place {
            id: node.id,
            name: node.name,
            geometry: Point::new(node.x, node.y),
        })
        .collect();

    let edges = edges
        .into_iter()
        .map(|edge| Edge {
            geometry: edge
                .geom
                .as_ref()
                .map(raw::feature_coords)
                .filter(|coords| coords.len() >= 2)
                .map(LineString::from),
            source: edge.source,
            target: edge.target,
            length: edge.length,
        })
        .collect();

    let manual_routes = routes
        .into_iter()
        .map(|route| {
            let geometry = route
                .geom
                .as_ref()
                .map(raw::feature_coords)
                .filter(|coords| !coords.is_empty())
                .or_else(|| route.path.as_deref().map(raw::legacy_path_coords))
                .unwrap_or_default();
            ManualRoute {
                start: route.start,
                end: route.end,
                length: route.length,
                geometry,
            }
        })
        .collect();

    CampusMap::new(places, edges, manual_routes)
}

fn read_json<T>(path: &Path) -> Result<T, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(e.kind(), format!("failed to open '{}': {e}", path.display()))
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlaceId;

    #[test]
    fn parses_editor_shapes_with_mixed_id_types() {
        let nodes: Vec<RawNode> = serde_json::from_str(
            r#"[
                {"id": 1, "name": "Gate", "x": 0, "y": 0},
                {"id": "2", "name": "Library", "x": 100, "y": 0}
            ]"#,
        )
        .unwrap();
        let edges: Vec<RawEdge> = serde_json::from_str(
            r#"[{
                "source": 1,
                "target": "2",
                "length": 100,
                "geom": {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[0, 0], [50, 5], [100, 0]]
                    }
                }
            }]"#,
        )
        .unwrap();
        let map = build_campus_map(nodes, edges, Vec::new());

        assert_eq!(map.place_count(), 2);
        let edge = map
            .edge_between(&PlaceId::from(1), &PlaceId::from(2))
            .unwrap();
        assert_eq!(edge.geometry.as_ref().unwrap().coords().count(), 3);
    }

    #[test]
    fn manual_route_prefers_geom_over_legacy_path() {
        let routes: Vec<RawManualRoute> = serde_json::from_str(
            r#"[
                {
                    "start": 1, "end": 2, "length": 10,
                    "geom": {
                        "type": "Feature",
                        "properties": {},
                        "geometry": {"type": "LineString", "coordinates": [[0,0],[5,5]]}
                    },
                    "path": [[9,9],[8,8]]
                },
                {"start": 2, "end": 3, "length": 4, "path": [[5,5],[7,7]]}
            ]"#,
        )
        .unwrap();
        let map = build_campus_map(Vec::new(), Vec::new(), routes);

        assert_eq!(map.manual_routes()[0].geometry[1].x, 5.0);
        assert_eq!(map.manual_routes()[1].geometry[1].x, 7.0);
    }

    #[test]
    fn edge_with_degenerate_geometry_falls_back_to_none() {
        let edges: Vec<RawEdge> = serde_json::from_str(
            r#"[{
                "source": 1, "target": 2, "length": 5,
                "geom": {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {"type": "LineString", "coordinates": [[0, 0]]}
                }
            }]"#,
        )
        .unwrap();
        let map = build_campus_map(Vec::new(), edges, Vec::new());
        assert!(
            map.edge_between(&PlaceId::from(1), &PlaceId::from(2))
                .unwrap()
                .geometry
                .is_none()
        );
    }
}
