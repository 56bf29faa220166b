use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::model::PlaceId;
use crate::routing::graph::Adjacency;

#[derive(Clone, PartialEq)]
struct State {
    cost: f64,
    node: PlaceId,
}

impl Eq for State {}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap).
        // Weights are finite geometry lengths, so total_cmp is a plain
        // numeric order here.
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A shortest path found by [`shortest_path`]: the ordered node sequence
/// from start to goal inclusive, and the total weighted distance in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub path: Vec<PlaceId>,
    pub distance: f64,
}

/// Dijkstra's algorithm over the campus adjacency map, stopping early once
/// the goal is extracted. Returns `None` when the goal is unreachable.
///
/// `start == goal` yields a single-node path at distance zero rather than
/// an ambiguous empty path.
#[must_use]
pub fn shortest_path(adjacency: &Adjacency, start: &PlaceId, goal: &PlaceId) -> Option<SearchResult> {
    if start == goal {
        return Some(SearchResult {
            path: vec![start.clone()],
            distance: 0.0,
        });
    }

    let estimated = adjacency.len();
    let mut distances: HashMap<PlaceId, f64> = HashMap::with_capacity(estimated);
    let mut predecessors: HashMap<PlaceId, PlaceId> = HashMap::with_capacity(estimated);
    let mut heap = BinaryHeap::with_capacity(estimated / 4 + 1);

    distances.insert(start.clone(), 0.0);
    heap.push(State {
        cost: 0.0,
        node: start.clone(),
    });

    while let Some(State { cost, node }) = heap.pop() {
        if node == *goal {
            break;
        }

        // Skip stale heap entries for which a better path is already known
        if let Some(&best) = distances.get(&node) {
            if cost > best {
                continue;
            }
        }

        let Some(neighbors) = adjacency.get(&node) else {
            continue;
        };
        for neighbor in neighbors {
            let next_cost = cost + neighbor.weight;
            match distances.entry(neighbor.to.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    predecessors.insert(neighbor.to.clone(), node.clone());
                    heap.push(State {
                        cost: next_cost,
                        node: neighbor.to.clone(),
                    });
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        predecessors.insert(neighbor.to.clone(), node.clone());
                        heap.push(State {
                            cost: next_cost,
                            node: neighbor.to.clone(),
                        });
                    }
                }
            }
        }
    }

    let distance = *distances.get(goal)?;

    // Follow predecessors backward from goal to start
    let mut path = vec![goal.clone()];
    let mut current = goal;
    while current != start {
        let prev = predecessors.get(current)?;
        path.push(prev.clone());
        current = prev;
    }
    path.reverse();

    Some(SearchResult { path, distance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;
    use crate::routing::graph::build_adjacency;

    fn adjacency(edges: &[(i64, i64, f64)]) -> Adjacency {
        let edges: Vec<Edge> = edges
            .iter()
            .map(|&(source, target, length)| Edge {
                source: PlaceId::from(source),
                target: PlaceId::from(target),
                length,
                geometry: None,
            })
            .collect();
        build_adjacency(&edges)
    }

    #[test]
    fn prefers_shorter_multi_hop_path_over_direct_edge() {
        let adj = adjacency(&[(1, 2, 10.0), (2, 3, 5.0), (1, 3, 20.0)]);
        let result = shortest_path(&adj, &PlaceId::from(1), &PlaceId::from(3)).unwrap();
        assert_eq!(
            result.path,
            vec![PlaceId::from(1), PlaceId::from(2), PlaceId::from(3)]
        );
        assert!((result.distance - 15.0).abs() < 1e-9);
    }

    #[test]
    fn unreachable_goal_returns_none() {
        let adj = adjacency(&[(1, 2, 10.0), (2, 3, 5.0)]);
        assert!(shortest_path(&adj, &PlaceId::from(1), &PlaceId::from(4)).is_none());
    }

    #[test]
    fn start_equals_goal_is_a_zero_length_single_node_path() {
        let adj = adjacency(&[(1, 2, 10.0)]);
        let result = shortest_path(&adj, &PlaceId::from(1), &PlaceId::from(1)).unwrap();
        assert_eq!(result.path, vec![PlaceId::from(1)]);
        assert_eq!(result.distance, 0.0);
    }

    #[test]
    fn relaxation_updates_longer_tentative_paths() {
        // 1 -> 4 direct is 100; via 2 and 3 it is 30
        let adj = adjacency(&[(1, 4, 100.0), (1, 2, 10.0), (2, 3, 10.0), (3, 4, 10.0)]);
        let result = shortest_path(&adj, &PlaceId::from(1), &PlaceId::from(4)).unwrap();
        assert_eq!(result.path.len(), 4);
        assert!((result.distance - 30.0).abs() < 1e-9);
    }
}
