//! Campus navigation routing engine
//!
//! Computes walking routes over a campus graph and turns them into
//! turn-by-turn directions and marker animations. The campus is described
//! in a fixed planar pixel space: named places, weighted edges with
//! optional traced geometry, and hand-traced override routes that take
//! precedence over graph search.
//!
//! The crate is UI-agnostic: it consumes the data files exported by the
//! map editor and exposes pure route/direction computations plus a
//! tick-driven [`animator::MarkerAnimator`] that any frontend can drive
//! from its own frame scheduler.

pub mod animator;
pub mod directions;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;

/// How many meters one pixel on the campus map represents.
/// Must match the scale used when tracing routes in the map editor.
pub const METERS_PER_PIXEL: f64 = 0.5;

/// Heading changes sharper than this (in degrees) are reported as turns.
pub const TURN_THRESHOLD_DEG: f64 = 35.0;

/// Spacing in pixels between densified animation samples. Constant spacing
/// keeps the marker speed visually uniform across segments of any length.
pub const INTERPOLATION_STEP_PX: f64 = 5.0;

/// Default marker animation duration in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 5_000.0;
