//! Turn-by-turn directions.
//!
//! Walks a resolved route's point sequence, detects turns from the angle
//! between consecutive segment vectors and emits human-readable steps.
//! Distances are accumulated in pixels and reported in whole meters via
//! [`crate::METERS_PER_PIXEL`].

use hashbrown::HashMap;
use log::warn;
use serde::Serialize;

use crate::model::{Place, PlaceId, Route, RoutePoint};
use crate::{METERS_PER_PIXEL, TURN_THRESHOLD_DEG};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Start,
    Turn,
    Straight,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    fn label(self) -> &'static str {
        match self {
            TurnDirection::Left => "left",
            TurnDirection::Right => "right",
        }
    }
}

/// One instruction unit in the turn-by-turn sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionStep {
    pub id: String,
    pub kind: StepKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<TurnDirection>,
    pub title: String,
    pub detail: String,
    /// Whole meters covered by this step's lead-in (0 for start/end)
    pub distance: u32,
    /// Index into the route's point sequence where this step begins
    pub start_index: usize,
}

/// Generates turn-by-turn directions for a resolved route.
///
/// Pure: the same route always produces the same steps. Returns an empty
/// list when the route has fewer than two points or non-finite endpoints.
#[must_use]
pub fn generate_directions(route: &Route, places: &HashMap<PlaceId, Place>) -> Vec<DirectionStep> {
    let points = &route.points;
    let (Some(start), Some(end)) = (points.first(), points.last()) else {
        warn!("route has no points; no directions generated");
        return Vec::new();
    };
    if points.len() < 2 {
        warn!("route has fewer than 2 points; no directions generated");
        return Vec::new();
    }
    if !point_is_finite(start) || !point_is_finite(end) {
        warn!("route endpoints are not finite; no directions generated");
        return Vec::new();
    }

    let start_name = display_name(start, places, "Start");
    let end_name = display_name(end, places, "Destination");

    let mut steps = Vec::new();
    steps.push(DirectionStep {
        id: "start".to_string(),
        kind: StepKind::Start,
        turn: None,
        title: format!("Start at {start_name}"),
        detail: "Begin your journey here.".to_string(),
        distance: 0,
        start_index: 0,
    });

    let mut pixels_since_turn = 0.0_f64;
    let mut last_turn_index = 0_usize;

    for i in 1..points.len() - 1 {
        let prev = &points[i - 1];
        let curr = &points[i];
        let next = &points[i + 1];
        if !point_is_finite(prev) || !point_is_finite(curr) || !point_is_finite(next) {
            continue;
        }

        pixels_since_turn += segment_pixels(prev, curr);

        let v1 = (curr.x - prev.x, curr.y - prev.y);
        let v2 = (next.x - curr.x, next.y - curr.y);
        let mag1 = v1.0.hypot(v1.1);
        let mag2 = v2.0.hypot(v2.1);
        if mag1 == 0.0 || mag2 == 0.0 {
            continue;
        }

        // Clamp the cosine against floating-point drift before acos
        let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (mag1 * mag2)).clamp(-1.0, 1.0);
        let angle_deg = cos.acos().to_degrees();
        if angle_deg <= TURN_THRESHOLD_DEG {
            continue;
        }

        let cross = v1.0 * v2.1 - v1.1 * v2.0;
        let turn = if cross > 0.0 {
            TurnDirection::Left
        } else {
            TurnDirection::Right
        };
        let meters = round_meters(pixels_since_turn);
        pixels_since_turn = 0.0;

        let dir = turn.label();
        let step = if meters > 0 {
            DirectionStep {
                id: format!("turn-{i}"),
                kind: StepKind::Turn,
                turn: Some(turn),
                title: format!("Turn {dir}"),
                detail: format!("In {meters} m, turn {dir}."),
                distance: meters,
                // The step covers the lead-in that began at the last turn
                start_index: last_turn_index,
            }
        } else {
            DirectionStep {
                id: format!("turn-{i}"),
                kind: StepKind::Turn,
                turn: Some(turn),
                title: format!("Turn {dir}"),
                detail: format!("Turn {dir} here."),
                distance: 0,
                // Immediate turn
                start_index: i,
            }
        };
        steps.push(step);
        last_turn_index = i;
    }

    // Fold the final segment into the accumulator
    let second_last = &points[points.len() - 2];
    if point_is_finite(second_last) {
        pixels_since_turn += segment_pixels(second_last, end);
    }

    // A turn at the final interior point already points into the last leg;
    // a "continue straight" after it would repeat the arrive step.
    let turned_into_final_leg = last_turn_index != 0 && last_turn_index == points.len() - 2;

    let remaining = round_meters(pixels_since_turn);
    if remaining > 0 && !turned_into_final_leg {
        steps.push(DirectionStep {
            id: "straight".to_string(),
            kind: StepKind::Straight,
            turn: None,
            title: "Continue straight".to_string(),
            detail: format!("Continue for about {remaining} m to reach your destination."),
            distance: remaining,
            start_index: last_turn_index,
        });
    }

    steps.push(DirectionStep {
        id: "end".to_string(),
        kind: StepKind::End,
        turn: None,
        title: format!("Arrive at {end_name}"),
        detail: format!("You have reached {end_name}."),
        distance: 0,
        start_index: points.len() - 1,
    });

    steps
}

fn display_name<'a>(
    point: &RoutePoint,
    places: &'a HashMap<PlaceId, Place>,
    default: &'a str,
) -> &'a str {
    point
        .place_id
        .as_ref()
        .and_then(|id| places.get(id))
        .map_or(default, |place| place.name.as_str())
}

fn point_is_finite(point: &RoutePoint) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

fn segment_pixels(a: &RoutePoint, b: &RoutePoint) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_meters(pixels: f64) -> u32 {
    (pixels * METERS_PER_PIXEL).round().max(0.0) as u32
}
