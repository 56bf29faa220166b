//! Data model for campus navigation
//!
//! Contains types and structures for representing the campus map and
//! resolved routes. All geometry lives in one fixed planar pixel space.

mod campus;
mod place;
mod route;

pub use campus::{CampusMap, Edge, ManualRoute};
pub use place::{Place, PlaceId};
pub use route::{Route, RoutePoint, polyline_pixels};
