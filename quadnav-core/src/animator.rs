//! Marker animation along a resolved route.
//!
//! [`MarkerAnimator`] is a timed state machine, not a passive transform: it
//! owns a densified copy of the route and, driven by per-frame [`tick`]
//! calls from the host, emits interpolated positions and headings at a
//! visually constant speed. It is deliberately independent of any concrete
//! frame scheduler — a [`Clock`] supplies time and the host decides when
//! frames happen, so the same machine runs under a browser-style animation
//! loop, a timer, or a test harness.
//!
//! [`tick`]: MarkerAnimator::tick

use std::time::Instant;

use geo::Coord;
use itertools::Itertools;
use log::{error, warn};

use crate::INTERPOLATION_STEP_PX;
use crate::model::RoutePoint;

/// Millisecond time source for the animator.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock anchored at construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Externally observable animator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Idle,
    Playing,
    Paused,
    Completed,
}

/// One interpolated frame along the route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    /// Heading in degrees from `atan2(dy, dx)`; 0 for a zero-length step
    pub heading_deg: f64,
    /// Overall progress in [0, 1]
    pub progress: f64,
    /// Index of the route's original segment this frame lies on
    pub original_segment: usize,
}

#[derive(Debug, Clone, Copy)]
struct PathSample {
    coord: Coord<f64>,
    original_segment: usize,
}

type UpdateFn = Box<dyn FnMut(Frame)>;
type SegmentFn = Box<dyn FnMut(usize)>;
type CompleteFn = Box<dyn FnMut()>;

/// Animates a marker along a route's point sequence over a fixed duration.
///
/// States: Idle -> Playing <-> Paused -> Completed. `stop` resets to Idle
/// from anywhere; `replay` restarts from scratch. Exactly one animator
/// should be live per resolved route — dispose the old one before building
/// the next or stale frames will fight over the marker.
pub struct MarkerAnimator {
    samples: Vec<PathSample>,
    original_len: usize,
    duration_ms: f64,
    clock: Box<dyn Clock>,
    state: AnimatorState,
    start_time: Option<f64>,
    pause_time: Option<f64>,
    elapsed_ms: f64,
    current_original_segment: Option<usize>,
    on_update: Option<UpdateFn>,
    on_segment_change: Option<SegmentFn>,
    on_complete: Option<CompleteFn>,
}

impl MarkerAnimator {
    #[must_use]
    pub fn new(points: &[RoutePoint], duration_ms: f64) -> Self {
        Self::with_clock(points, duration_ms, Box::new(SystemClock::new()))
    }

    /// Builds an animator driven by an explicit clock (tests, replays).
    #[must_use]
    pub fn with_clock(points: &[RoutePoint], duration_ms: f64, clock: Box<dyn Clock>) -> Self {
        if points.len() < 2 {
            warn!("animator built with fewer than 2 points; it will refuse to play");
        }
        Self {
            samples: densify(points),
            original_len: points.len(),
            duration_ms,
            clock,
            state: AnimatorState::Idle,
            start_time: None,
            pause_time: None,
            elapsed_ms: 0.0,
            current_original_segment: None,
            on_update: None,
            on_segment_change: None,
            on_complete: None,
        }
    }

    /// Called with every emitted frame.
    #[must_use]
    pub fn on_update(mut self, callback: impl FnMut(Frame) + 'static) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Called when the frame crosses into a new original segment, in
    /// non-decreasing segment order during a play-through.
    #[must_use]
    pub fn on_segment_change(mut self, callback: impl FnMut(usize) + 'static) -> Self {
        self.on_segment_change = Some(Box::new(callback));
        self
    }

    /// Called once when playback reaches the end of the route.
    #[must_use]
    pub fn on_complete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn state(&self) -> AnimatorState {
        self.state
    }

    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Starts playback, or resumes it after a pause with elapsed progress
    /// preserved. No-op while already playing.
    pub fn play(&mut self) {
        if self.samples.len() < 2 {
            warn!("cannot play: insufficient points");
            return;
        }
        match self.state {
            AnimatorState::Playing => {}
            AnimatorState::Paused => {
                // Shift the start time forward by the paused span so the
                // marker picks up exactly where it stopped
                let now = self.clock.now_ms();
                if let (Some(paused_at), Some(start)) = (self.pause_time.take(), self.start_time) {
                    self.start_time = Some(start + (now - paused_at));
                }
                self.state = AnimatorState::Playing;
            }
            AnimatorState::Idle | AnimatorState::Completed => {
                self.start_time = Some(self.clock.now_ms());
                self.pause_time = None;
                self.elapsed_ms = 0.0;
                self.current_original_segment = None;
                self.state = AnimatorState::Playing;
            }
        }
    }

    /// Suspends playback, retaining elapsed state. No-op unless playing.
    pub fn pause(&mut self) {
        if self.state != AnimatorState::Playing {
            return;
        }
        self.pause_time = Some(self.clock.now_ms());
        self.state = AnimatorState::Paused;
    }

    /// Hard reset to Idle. Clears timers and counters without invoking any
    /// callback. Idempotent.
    pub fn stop(&mut self) {
        self.state = AnimatorState::Idle;
        self.start_time = None;
        self.pause_time = None;
        self.elapsed_ms = 0.0;
        self.current_original_segment = None;
    }

    /// Restarts playback from the beginning.
    pub fn replay(&mut self) {
        self.stop();
        self.play();
    }

    /// Changes the total duration while preserving the current fractional
    /// progress, so the marker does not jump.
    pub fn set_speed(&mut self, duration_ms: f64) {
        let progress = if self.duration_ms > 0.0 {
            self.elapsed_ms / self.duration_ms
        } else {
            0.0
        };
        self.duration_ms = duration_ms;
        if self.state == AnimatorState::Playing {
            self.start_time = Some(self.clock.now_ms() - progress * duration_ms);
        }
    }

    /// Stops playback and releases callbacks and points. Nothing fires
    /// after this call. Idempotent.
    pub fn destroy(&mut self) {
        self.stop();
        self.on_update = None;
        self.on_segment_change = None;
        self.on_complete = None;
        self.samples.clear();
    }

    /// Advances one animation frame. Returns `true` while the host should
    /// keep scheduling frames.
    pub fn tick(&mut self) -> bool {
        if self.state != AnimatorState::Playing {
            return false;
        }
        let Some(start_time) = self.start_time else {
            return false;
        };

        self.elapsed_ms = self.clock.now_ms() - start_time;
        let mut progress = if self.duration_ms > 0.0 {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let segment_count = self.samples.len() - 1;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut index = (progress * segment_count as f64).floor() as usize;
        let mut local_t = progress * segment_count as f64 - index as f64;
        if index >= segment_count {
            index = segment_count - 1;
            local_t = 1.0;
            progress = 1.0;
        }

        let a = self.samples[index];
        let b = self.samples[index + 1];
        if !coord_is_finite(a.coord) || !coord_is_finite(b.coord) {
            error!("non-finite coordinate in densified path at sample {index}; aborting animation");
            self.stop();
            return false;
        }

        let x = a.coord.x + (b.coord.x - a.coord.x) * local_t;
        let y = a.coord.y + (b.coord.y - a.coord.y) * local_t;
        let dx = b.coord.x - a.coord.x;
        let dy = b.coord.y - a.coord.y;
        let heading_deg = if dx == 0.0 && dy == 0.0 {
            0.0
        } else {
            dy.atan2(dx).to_degrees()
        };
        let original_segment = a.original_segment;

        if let Some(callback) = self.on_update.as_mut() {
            callback(Frame {
                x,
                y,
                heading_deg,
                progress,
                original_segment,
            });
        }

        if self.current_original_segment != Some(original_segment) {
            self.current_original_segment = Some(original_segment);
            if let Some(callback) = self.on_segment_change.as_mut() {
                callback(original_segment);
            }
        }

        if progress >= 1.0 {
            // Report the final original point so the arrived transition
            // fires even when the last sample's segment tag lags behind
            if let Some(callback) = self.on_segment_change.as_mut() {
                callback(self.original_len - 1);
            }
            self.state = AnimatorState::Completed;
            self.start_time = None;
            self.pause_time = None;
            if let Some(callback) = self.on_complete.as_mut() {
                callback();
            }
            return false;
        }

        true
    }
}

fn coord_is_finite(coord: Coord<f64>) -> bool {
    coord.x.is_finite() && coord.y.is_finite()
}

/// Interpolates intermediate samples at a fixed pixel spacing so traversal
/// speed stays visually constant regardless of segment length variance.
/// Every sample keeps the index of the original segment it belongs to.
fn densify(points: &[RoutePoint]) -> Vec<PathSample> {
    if points.len() < 2 {
        return points
            .iter()
            .map(|p| PathSample {
                coord: p.coord(),
                original_segment: 0,
            })
            .collect();
    }

    let mut samples = Vec::new();
    for (i, (start, end)) in points.iter().tuple_windows().enumerate() {
        let dist = (end.x - start.x).hypot(end.y - start.y);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = ((dist / INTERPOLATION_STEP_PX).floor() as usize).max(1);
        for j in 0..steps {
            let t = j as f64 / steps as f64;
            samples.push(PathSample {
                coord: Coord {
                    x: start.x + (end.x - start.x) * t,
                    y: start.y + (end.y - start.y) * t,
                },
                original_segment: i,
            });
        }
    }
    // The final point belongs to the last segment
    if let Some(last) = points.last() {
        samples.push(PathSample {
            coord: last.coord(),
            original_segment: points.len() - 2,
        });
    }
    samples
}
