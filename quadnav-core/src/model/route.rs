use geo::Coord;
use itertools::Itertools;
use serde::Serialize;

use crate::model::PlaceId;

/// One vertex of a resolved route, in map pixels. `place_id` is set only on
/// the two endpoints so consumers can label them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePoint {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<PlaceId>,
}

impl RoutePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            place_id: None,
        }
    }

    #[must_use]
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

/// A resolved route: the ordered point sequence plus total pixel length.
/// Ephemeral — built per request and replaced wholesale by the next one.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub points: Vec<RoutePoint>,
    pub length: f64,
}

/// Total polyline length in pixels.
#[must_use]
pub fn polyline_pixels(coords: &[Coord<f64>]) -> f64 {
    coords
        .iter()
        .tuple_windows()
        .map(|(a, b)| (b.x - a.x).hypot(b.y - a.y))
        .sum()
}
