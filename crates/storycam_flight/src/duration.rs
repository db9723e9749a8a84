// SPDX-License-Identifier: MIT OR Apache-2.0
//! Distance-adaptive flight timing.
//!
//! Short hops stay snappy. Long hops get longer and loft higher, but both are
//! capped so a flight never blocks the viewer for long.

use glam::Vec3;

/// Distance below which a hop counts as fully "near"
pub const NEAR_DISTANCE: f32 = 24.0;
/// Distance over which proximity ramps from near to far
pub const PROXIMITY_RAMP: f32 = 90.0;
/// Shortest flight (ms)
pub const MIN_DURATION_MS: f32 = 700.0;
/// Longest flight (ms)
pub const MAX_DURATION_MS: f32 = 4200.0;
/// Highest vertical arc for lofted paths
pub const MAX_ARC_HEIGHT: f32 = 140.0;

/// Timing derived for one flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightTiming {
    /// Distance between start and end positions
    pub distance: f32,
    /// 0 for near hops, 1 for far hops
    pub proximity_ratio: f32,
    /// Duration actually used by the animator (ms)
    pub effective_duration_ms: f32,
    /// Vertical loft applied to the path
    pub fly_arc_height: f32,
}

/// Map a distance onto `[0, 1]`: 0 up to [`NEAR_DISTANCE`], 1 past the ramp.
pub fn proximity_ratio(distance: f32) -> f32 {
    ((distance - NEAR_DISTANCE) / PROXIMITY_RAMP).clamp(0.0, 1.0)
}

/// Timing for a flight between two positions.
pub fn flight_timing(start: Vec3, end: Vec3, base_duration_ms: f32) -> FlightTiming {
    timing_for_distance(start.distance(end), base_duration_ms)
}

/// Timing for a flight covering `distance`.
pub fn timing_for_distance(distance: f32, base_duration_ms: f32) -> FlightTiming {
    let distance = distance.max(0.0);
    let ratio = proximity_ratio(distance);

    let scaled_base = base_duration_ms * (0.5 + 0.85 * ratio);
    let travel = 650.0 + distance * (14.0 + 12.0 * ratio);
    let effective_duration_ms = scaled_base
        .max(travel)
        .clamp(MIN_DURATION_MS, MAX_DURATION_MS);

    let fly_arc_height = (distance * (0.05 + 0.3 * ratio) + 10.0 * ratio).clamp(0.0, MAX_ARC_HEIGHT);

    FlightTiming {
        distance,
        proximity_ratio: ratio,
        effective_duration_ms,
        fly_arc_height,
    }
}
