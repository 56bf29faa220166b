//! Route resolution policy.
//!
//! Attempts, in order: a hand-traced manual route for the requested pair
//! (in either direction), a Dijkstra search with per-edge geometry
//! stitching, and finally a straight line between the two places. The first
//! attempt that yields at least two finite points wins.

use geo::{Coord, LineString};
use itertools::Itertools;
use log::debug;

use crate::error::Error;
use crate::model::{CampusMap, ManualRoute, Place, PlaceId, Route, RoutePoint, polyline_pixels};
use crate::routing::dijkstra::shortest_path;

/// Resolves a route between two places.
///
/// # Errors
///
/// Returns [`Error::UnknownPlace`] when either endpoint is not on the map
/// and [`Error::NoRoute`] when no attempt produced two finite points.
/// Failures never leave a partial route behind.
pub fn resolve_route(map: &CampusMap, start: &PlaceId, end: &PlaceId) -> Result<Route, Error> {
    let start_place = map
        .place(start)
        .ok_or_else(|| Error::UnknownPlace(start.clone()))?;
    let end_place = map
        .place(end)
        .ok_or_else(|| Error::UnknownPlace(end.clone()))?;

    // 1. Hand-traced route for this pair, either direction
    if let Some((manual, reversed)) = find_manual_route(map, start, end) {
        let mut coords = manual.geometry.clone();
        if reversed {
            coords.reverse();
        }
        let points = finite_points(&coords, start, end);
        if points.len() >= 2 {
            // The stored length can be stale; recompute from the retained
            // coordinate sequence.
            let retained: Vec<Coord<f64>> = points.iter().map(RoutePoint::coord).collect();
            let length = polyline_pixels(&retained);
            debug!("manual route {start} -> {end}: {} points", points.len());
            return Ok(Route { points, length });
        }
    }

    // 2. Graph search with geometry stitching
    if let Some(result) = shortest_path(map.adjacency(), start, end) {
        if result.path.len() > 1 {
            let coords = stitch_path_geometry(map, &result.path);
            let points = finite_points(&coords, start, end);
            if points.len() >= 2 {
                debug!(
                    "graph route {start} -> {end}: {} nodes, {:.0} px",
                    result.path.len(),
                    result.distance
                );
                return Ok(Route {
                    points,
                    length: result.distance,
                });
            }
        }
    }

    // 3. Straight line between the endpoints
    let a: Coord<f64> = start_place.geometry.into();
    let b: Coord<f64> = end_place.geometry.into();
    if a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite() {
        debug!("straight-line fallback {start} -> {end}");
        let points = finite_points(&[a, b], start, end);
        return Ok(Route {
            points,
            length: (b.x - a.x).hypot(b.y - a.y),
        });
    }

    Err(Error::NoRoute {
        start: start.clone(),
        end: end.clone(),
    })
}

/// Finds a manual route for the pair in either direction. The bool is true
/// when the stored geometry must be reversed to run start -> end. Routes
/// with fewer than two coordinates are skipped.
fn find_manual_route<'a>(
    map: &'a CampusMap,
    start: &PlaceId,
    end: &PlaceId,
) -> Option<(&'a ManualRoute, bool)> {
    map.manual_routes().iter().find_map(|route| {
        if route.geometry.len() < 2 {
            return None;
        }
        if route.start == *start && route.end == *end {
            Some((route, false))
        } else if route.start == *end && route.end == *start {
            Some((route, true))
        } else {
            None
        }
    })
}

/// Concatenates the geometry of each consecutive edge along a node path.
/// Edges without geometry contribute the straight segment between their
/// node coordinates. The join coordinate shared by consecutive edges is
/// dropped from every edge after the first.
fn stitch_path_geometry(map: &CampusMap, path: &[PlaceId]) -> Vec<Coord<f64>> {
    let mut seq: Vec<Coord<f64>> = Vec::new();
    for (from, to) in path.iter().tuple_windows() {
        let coords = match map.edge_between(from, to).and_then(|e| e.geometry.as_ref()) {
            Some(line) => oriented_coords(line, map.place(from)),
            None => match (map.place(from), map.place(to)) {
                (Some(a), Some(b)) => vec![a.geometry.into(), b.geometry.into()],
                _ => continue,
            },
        };
        if seq.is_empty() {
            seq.extend(coords);
        } else {
            seq.extend(coords.into_iter().skip(1));
        }
    }
    seq
}

/// Edge geometry is stored without a guaranteed direction; flip it when its
/// far end is the one sitting on the from-node.
fn oriented_coords(line: &LineString<f64>, from: Option<&Place>) -> Vec<Coord<f64>> {
    let mut coords: Vec<Coord<f64>> = line.coords().copied().collect();
    if let (Some(place), Some(first), Some(last)) = (from, coords.first(), coords.last()) {
        let origin: Coord<f64> = place.geometry.into();
        let d_first = (first.x - origin.x).hypot(first.y - origin.y);
        let d_last = (last.x - origin.x).hypot(last.y - origin.y);
        if d_last < d_first {
            coords.reverse();
        }
    }
    coords
}

/// Drops non-finite coordinates and tags the first and last retained points
/// with the requested endpoint ids.
fn finite_points(coords: &[Coord<f64>], start: &PlaceId, end: &PlaceId) -> Vec<RoutePoint> {
    let mut points: Vec<RoutePoint> = coords
        .iter()
        .filter(|c| c.x.is_finite() && c.y.is_finite())
        .map(|c| RoutePoint::new(c.x, c.y))
        .collect();
    if let Some(first) = points.first_mut() {
        first.place_id = Some(start.clone());
    }
    if points.len() > 1 {
        if let Some(last) = points.last_mut() {
            last.place_id = Some(end.clone());
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use geo::{Point, line_string};

    use super::*;
    use crate::model::Edge;

    fn place(id: i64, x: f64, y: f64) -> Place {
        Place {
            id: PlaceId::from(id),
            name: format!("Place {id}"),
            geometry: Point::new(x, y),
        }
    }

    fn edge(source: i64, target: i64, length: f64) -> Edge {
        Edge {
            source: PlaceId::from(source),
            target: PlaceId::from(target),
            length,
            geometry: None,
        }
    }

    fn triangle_map(manual_routes: Vec<ManualRoute>) -> CampusMap {
        CampusMap::new(
            vec![
                place(1, 0.0, 0.0),
                place(2, 100.0, 0.0),
                place(3, 100.0, 100.0),
            ],
            vec![edge(1, 2, 100.0), edge(2, 3, 100.0), edge(1, 3, 300.0)],
            manual_routes,
        )
    }

    #[test]
    fn manual_route_takes_precedence_over_graph_search() {
        let manual = ManualRoute {
            start: PlaceId::from(1),
            end: PlaceId::from(3),
            length: 12.0, // stale on purpose
            geometry: vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 50.0, y: 60.0 },
                Coord { x: 100.0, y: 100.0 },
            ],
        };
        let map = triangle_map(vec![manual]);
        let route = resolve_route(&map, &PlaceId::from(1), &PlaceId::from(3)).unwrap();
        assert_eq!(route.points.len(), 3);
        // Length is recomputed from geometry, not the stored 12 and not the
        // graph distance of 200.
        let expected = polyline_pixels(&[
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 50.0, y: 60.0 },
            Coord { x: 100.0, y: 100.0 },
        ]);
        assert!((route.length - expected).abs() < 1e-9);
    }

    #[test]
    fn manual_route_matched_backwards_is_reversed() {
        let manual = ManualRoute {
            start: PlaceId::from(3),
            end: PlaceId::from(1),
            length: 0.0,
            geometry: vec![
                Coord { x: 100.0, y: 100.0 },
                Coord { x: 60.0, y: 40.0 },
                Coord { x: 0.0, y: 0.0 },
            ],
        };
        let map = triangle_map(vec![manual]);
        let route = resolve_route(&map, &PlaceId::from(1), &PlaceId::from(3)).unwrap();
        assert_eq!(route.points[0].x, 0.0);
        assert_eq!(route.points[2].x, 100.0);
        // Endpoint tags follow the request, not the storage order
        assert_eq!(route.points[0].place_id, Some(PlaceId::from(1)));
        assert_eq!(route.points[2].place_id, Some(PlaceId::from(3)));
    }

    #[test]
    fn degenerate_manual_route_falls_through_to_graph_search() {
        let manual = ManualRoute {
            start: PlaceId::from(1),
            end: PlaceId::from(3),
            length: 5.0,
            geometry: vec![Coord { x: 0.0, y: 0.0 }],
        };
        let map = triangle_map(vec![manual]);
        let route = resolve_route(&map, &PlaceId::from(1), &PlaceId::from(3)).unwrap();
        // Graph path 1-2-3 at weight 200 beats the 300 direct edge
        assert!((route.length - 200.0).abs() < 1e-9);
        assert_eq!(route.points.len(), 3);
    }

    #[test]
    fn graph_route_stitches_edge_geometry_and_dedups_joins() {
        let mut edge_a = edge(1, 2, 100.0);
        // Stored backwards: 2 -> 1. The resolver must flip it.
        edge_a.geometry = Some(line_string![
            (x: 100.0, y: 0.0),
            (x: 50.0, y: 5.0),
            (x: 0.0, y: 0.0),
        ]);
        let mut edge_b = edge(2, 3, 100.0);
        edge_b.geometry = Some(line_string![
            (x: 100.0, y: 0.0),
            (x: 100.0, y: 100.0),
        ]);
        let map = CampusMap::new(
            vec![
                place(1, 0.0, 0.0),
                place(2, 100.0, 0.0),
                place(3, 100.0, 100.0),
            ],
            vec![edge_a, edge_b],
            Vec::new(),
        );
        let route = resolve_route(&map, &PlaceId::from(1), &PlaceId::from(3)).unwrap();
        let xs: Vec<f64> = route.points.iter().map(|p| p.x).collect();
        // Oriented edge A (0 -> 50 -> 100) then edge B minus the duplicated
        // join at (100, 0)
        assert_eq!(xs, vec![0.0, 50.0, 100.0, 100.0]);
        assert!((route.length - 200.0).abs() < 1e-9);
    }

    #[test]
    fn disconnected_pair_falls_back_to_straight_line() {
        let map = CampusMap::new(
            vec![place(1, 0.0, 0.0), place(2, 10.0, 0.0), place(4, 30.0, 40.0)],
            vec![edge(1, 2, 10.0)],
            Vec::new(),
        );
        let route = resolve_route(&map, &PlaceId::from(1), &PlaceId::from(4)).unwrap();
        assert_eq!(route.points.len(), 2);
        assert!((route.length - 50.0).abs() < 1e-9);
        assert_eq!(route.points[0].place_id, Some(PlaceId::from(1)));
        assert_eq!(route.points[1].place_id, Some(PlaceId::from(4)));
    }

    #[test]
    fn unknown_endpoint_is_an_explicit_failure() {
        let map = triangle_map(Vec::new());
        let err = resolve_route(&map, &PlaceId::from(1), &PlaceId::from(99)).unwrap_err();
        assert!(matches!(err, Error::UnknownPlace(_)));
    }

    #[test]
    fn non_finite_manual_coordinates_are_filtered() {
        let manual = ManualRoute {
            start: PlaceId::from(1),
            end: PlaceId::from(3),
            length: 0.0,
            geometry: vec![
                Coord { x: 0.0, y: 0.0 },
                Coord {
                    x: f64::NAN,
                    y: 5.0,
                },
                Coord { x: 100.0, y: 100.0 },
            ],
        };
        let map = triangle_map(vec![manual]);
        let route = resolve_route(&map, &PlaceId::from(1), &PlaceId::from(3)).unwrap();
        assert_eq!(route.points.len(), 2);
        assert!(route.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}
