use hashbrown::HashMap;

use crate::model::{Edge, PlaceId};

/// Adjacency map of the campus graph: each place id maps to its reachable
/// neighbors with edge weights in pixels. Rebuilt wholesale whenever the
/// edge list changes.
pub type Adjacency = HashMap<PlaceId, Vec<Neighbor>>;

#[derive(Debug, Clone)]
pub struct Neighbor {
    pub to: PlaceId,
    pub weight: f64,
}

/// Builds the adjacency map. Each edge contributes both directions; places
/// without edges simply never appear and are implicitly unreachable.
#[must_use]
pub fn build_adjacency(edges: &[Edge]) -> Adjacency {
    let mut adjacency: Adjacency = HashMap::with_capacity(edges.len());
    for edge in edges {
        adjacency
            .entry(edge.source.clone())
            .or_default()
            .push(Neighbor {
                to: edge.target.clone(),
                weight: edge.length,
            });
        adjacency
            .entry(edge.target.clone())
            .or_default()
            .push(Neighbor {
                to: edge.source.clone(),
                weight: edge.length,
            });
    }
    adjacency
}

/// Unordered-pair lookup from `(a, b)` to the index of the connecting edge.
pub(crate) type EdgeLookup = HashMap<(PlaceId, PlaceId), usize>;

pub(crate) fn build_edge_lookup(edges: &[Edge]) -> EdgeLookup {
    let mut lookup = EdgeLookup::with_capacity(edges.len() * 2);
    for (idx, edge) in edges.iter().enumerate() {
        lookup.insert((edge.source.clone(), edge.target.clone()), idx);
        lookup.insert((edge.target.clone(), edge.source.clone()), idx);
    }
    lookup
}
