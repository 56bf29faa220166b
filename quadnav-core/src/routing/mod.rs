//! Route computation: adjacency construction, shortest-path search and the
//! resolution policy that prefers hand-traced routes over graph search.

pub mod dijkstra;
pub mod graph;
pub mod resolver;

pub use dijkstra::shortest_path;
pub use resolver::resolve_route;
