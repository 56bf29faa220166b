use geo::{Coord, LineString};
use hashbrown::HashMap;

use crate::model::{Place, PlaceId};
use crate::routing::graph::{Adjacency, EdgeLookup, build_adjacency, build_edge_lookup};

/// A traversable connection between two places (undirected).
#[derive(Debug, Clone)]
pub struct Edge {
    pub source: PlaceId,
    pub target: PlaceId,
    /// Pixel length precomputed by the map editor
    pub length: f64,
    /// Optional traced geometry. Its endpoints coincide with the node
    /// coordinates but the orientation is not guaranteed.
    pub geometry: Option<LineString<f64>>,
}

/// A hand-traced override path between a specific pair of places, preferred
/// over graph search. Stored orientation is start -> end.
#[derive(Debug, Clone)]
pub struct ManualRoute {
    pub start: PlaceId,
    pub end: PlaceId,
    /// Stored pixel length; the resolver recomputes from geometry instead
    /// of trusting this.
    pub length: f64,
    pub geometry: Vec<Coord<f64>>,
}

/// The loaded campus: places, edges, manual routes and the derived search
/// structures. Immutable for its lifetime — a data reload builds a fresh
/// map rather than mutating this one.
#[derive(Debug)]
pub struct CampusMap {
    places: HashMap<PlaceId, Place>,
    edges: Vec<Edge>,
    manual_routes: Vec<ManualRoute>,
    adjacency: Adjacency,
    edge_lookup: EdgeLookup,
}

impl CampusMap {
    #[must_use]
    pub fn new(places: Vec<Place>, edges: Vec<Edge>, manual_routes: Vec<ManualRoute>) -> Self {
        let adjacency = build_adjacency(&edges);
        let edge_lookup = build_edge_lookup(&edges);
        let places = places.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            places,
            edges,
            manual_routes,
            adjacency,
            edge_lookup,
        }
    }

    #[must_use]
    pub fn place(&self, id: &PlaceId) -> Option<&Place> {
        self.places.get(id)
    }

    #[must_use]
    pub fn places_by_id(&self) -> &HashMap<PlaceId, Place> {
        &self.places
    }

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.places.values()
    }

    #[must_use]
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn manual_routes(&self) -> &[ManualRoute] {
        &self.manual_routes
    }

    #[must_use]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// The edge connecting `a` and `b` in either direction, if any.
    #[must_use]
    pub fn edge_between(&self, a: &PlaceId, b: &PlaceId) -> Option<&Edge> {
        self.edge_lookup
            .get(&(a.clone(), b.clone()))
            .map(|&idx| &self.edges[idx])
    }
}
