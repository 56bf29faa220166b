// Re-export key components
pub use crate::animator::{AnimatorState, Clock, Frame, MarkerAnimator, SystemClock};
pub use crate::directions::{DirectionStep, StepKind, TurnDirection, generate_directions};
pub use crate::error::Error;
pub use crate::loading::load_campus_map;
pub use crate::model::{CampusMap, Edge, ManualRoute, Place, PlaceId, Route, RoutePoint};
pub use crate::routing::dijkstra::{SearchResult, shortest_path};
pub use crate::routing::resolver::resolve_route;

// Shared geometry constants
pub use crate::{DEFAULT_DURATION_MS, INTERPOLATION_STEP_PX, METERS_PER_PIXEL, TURN_THRESHOLD_DEG};
