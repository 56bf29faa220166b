use geo::Coord;
use serde::Deserialize;

use crate::model::PlaceId;

/// Record shapes as the map editor exports them. Ids arrive as numbers or
/// strings; [`PlaceId`] normalizes both.
#[derive(Debug, Deserialize)]
pub(super) struct RawNode {
    pub id: PlaceId,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawEdge {
    pub source: PlaceId,
    pub target: PlaceId,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub geom: Option<geojson::Feature>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawManualRoute {
    pub start: PlaceId,
    pub end: PlaceId,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub geom: Option<geojson::Feature>,
    /// Legacy flat coordinate list predating the GeoJSON export
    #[serde(default)]
    pub path: Option<Vec<Vec<f64>>>,
}

/// Extracts LineString coordinates from a `geom` feature, skipping
/// malformed entries rather than failing the load.
pub(super) fn feature_coords(feature: &geojson::Feature) -> Vec<Coord<f64>> {
    match feature.geometry.as_ref().map(|g| &g.value) {
        Some(geojson::Value::LineString(positions)) => positions
            .iter()
            .filter_map(|position| match position.as_slice() {
                [x, y, ..] if x.is_finite() && y.is_finite() => Some(Coord { x: *x, y: *y }),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub(super) fn legacy_path_coords(path: &[Vec<f64>]) -> Vec<Coord<f64>> {
    path.iter()
        .filter_map(|pair| match pair.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect()
}
