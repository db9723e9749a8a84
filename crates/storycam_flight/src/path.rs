// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flight paths between two positions.
//!
//! Short hops fly straight. Longer hops follow a centripetal Catmull-Rom
//! spline through two lofted control points, sampled by arc length so the
//! camera moves at constant speed along the curve.

use glam::Vec3;

/// Longest hop that still flies in a straight line
pub const DIRECT_PATH_MAX_DISTANCE: f32 = 40.0;
/// Cap on the sideways swing of a lofted path
pub const MAX_LATERAL_OFFSET: f32 = 22.0;
const LATERAL_OFFSET_FACTOR: f32 = 0.2;
const ARC_LENGTH_DIVISIONS: usize = 200;

/// A path parametrized by `t` in `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub enum FlightPath {
    /// Straight segment
    Direct {
        /// Start position
        start: Vec3,
        /// End position
        end: Vec3,
    },
    /// Lofted spline
    Lofted(LoftedSpline),
}

impl FlightPath {
    /// Plan a path from `start` to `end` with the given vertical loft.
    pub fn plan(start: Vec3, end: Vec3, arc_height: f32) -> Self {
        let distance = start.distance(end);
        if distance <= DIRECT_PATH_MAX_DISTANCE {
            return Self::Direct { start, end };
        }

        let midpoint = start.lerp(end, 0.5);
        let direction = (end - start) / distance;
        let lateral = direction.cross(Vec3::Y).normalize_or_zero()
            * MAX_LATERAL_OFFSET.min(distance * LATERAL_OFFSET_FACTOR);

        let rise = Vec3::Y * arc_height;
        let first = start.lerp(midpoint, 0.45) + rise * 0.8 + lateral;
        let second = midpoint + rise - lateral * 0.6;

        Self::Lofted(LoftedSpline::new([start, first, second, end]))
    }

    /// Position at `t`. `t <= 0` is the start and `t >= 1` the end, exactly.
    pub fn sample(&self, t: f32) -> Vec3 {
        let (start, end) = (self.start(), self.end());
        if t.is_nan() || t <= 0.0 {
            return start;
        }
        if t >= 1.0 {
            return end;
        }
        match self {
            Self::Direct { .. } => start.lerp(end, t),
            Self::Lofted(spline) => spline.point_at(t),
        }
    }

    /// First point of the path
    pub fn start(&self) -> Vec3 {
        match self {
            Self::Direct { start, .. } => *start,
            Self::Lofted(spline) => spline.points[0],
        }
    }

    /// Last point of the path
    pub fn end(&self) -> Vec3 {
        match self {
            Self::Direct { end, .. } => *end,
            Self::Lofted(spline) => spline.points[3],
        }
    }

    /// Whether this is a straight segment
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct { .. })
    }
}

/// Open centripetal Catmull-Rom spline through four points
#[derive(Debug, Clone, PartialEq)]
pub struct LoftedSpline {
    points: [Vec3; 4],
    /// Cumulative length at each of the evenly spaced parameter samples
    arc_lengths: Vec<f32>,
}

impl LoftedSpline {
    /// Build the spline and its arc-length table.
    pub fn new(points: [Vec3; 4]) -> Self {
        let mut spline = Self {
            points,
            arc_lengths: Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1),
        };

        let mut previous = spline.point(0.0);
        let mut total = 0.0;
        spline.arc_lengths.push(0.0);
        for i in 1..=ARC_LENGTH_DIVISIONS {
            let current = spline.point(i as f32 / ARC_LENGTH_DIVISIONS as f32);
            total += current.distance(previous);
            spline.arc_lengths.push(total);
            previous = current;
        }

        spline
    }

    /// Control points (start, two lofted points, end)
    pub fn points(&self) -> &[Vec3; 4] {
        &self.points
    }

    /// Approximate total length
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at fraction `u` of the arc length.
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.u_to_t(u))
    }

    fn u_to_t(&self, u: f32) -> f32 {
        let total = self.length();
        if total <= f32::EPSILON {
            return u;
        }

        let target = u * total;
        let last = self.arc_lengths.len() - 1;
        let i = self
            .arc_lengths
            .partition_point(|&length| length <= target)
            .saturating_sub(1)
            .min(last);

        if i == last {
            return 1.0;
        }

        let before = self.arc_lengths[i];
        let segment = self.arc_lengths[i + 1] - before;
        let fraction = if segment > 0.0 { (target - before) / segment } else { 0.0 };
        (i as f32 + fraction) / last as f32
    }

    /// Point at raw spline parameter `t`.
    fn point(&self, t: f32) -> Vec3 {
        let points = &self.points;
        let segments = points.len() - 1;
        let scaled = segments as f32 * t;
        let mut index = scaled.floor() as usize;
        let mut weight = scaled - index as f32;
        if index >= segments {
            index = segments - 1;
            weight = 1.0;
        }

        // Open ends are extended by mirroring the neighbouring point.
        let p0 = if index > 0 {
            points[index - 1]
        } else {
            points[0] * 2.0 - points[1]
        };
        let p1 = points[index];
        let p2 = points[index + 1];
        let p3 = if index + 2 < points.len() {
            points[index + 2]
        } else {
            points[segments] * 2.0 - points[segments - 1]
        };

        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let tangent1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
        let tangent2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

        hermite(p1, p2, tangent1, tangent2, weight)
    }
}

fn hermite(p1: Vec3, p2: Vec3, t1: Vec3, t2: Vec3, w: f32) -> Vec3 {
    let c2 = p1 * -3.0 + p2 * 3.0 - t1 * 2.0 - t2;
    let c3 = p1 * 2.0 - p2 * 2.0 + t1 + t2;
    p1 + t1 * w + c2 * (w * w) + c3 * (w * w * w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hop_is_direct() {
        let path = FlightPath::plan(Vec3::ZERO, Vec3::new(0.0, 0.0, 30.0), 2.0);
        assert!(path.is_direct());
        assert_eq!(path.sample(0.5), Vec3::new(0.0, 0.0, 15.0));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let path = FlightPath::plan(Vec3::ZERO, Vec3::new(40.0, 0.0, 0.0), 10.0);
        assert!(path.is_direct());
    }

    #[test]
    fn test_long_hop_is_lofted() {
        let start = Vec3::ZERO;
        let end = Vec3::new(100.0, 0.0, 0.0);
        let path = FlightPath::plan(start, end, 30.0);
        assert!(!path.is_direct());
        assert_eq!(path.sample(0.0), start);
        assert_eq!(path.sample(1.0), end);

        // Midway the camera is above the straight line
        assert!(path.sample(0.5).y > 10.0);
    }

    #[test]
    fn test_control_points() {
        let path = FlightPath::plan(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), 20.0);
        let FlightPath::Lofted(spline) = path else {
            panic!("expected a lofted path");
        };
        let [_, first, second, _] = *spline.points();

        // Travel along +X, lateral = X cross Y = +Z, magnitude min(22, 20) = 20
        assert!((first - Vec3::new(22.5, 16.0, 20.0)).length() < 1e-4);
        assert!((second - Vec3::new(50.0, 20.0, -12.0)).length() < 1e-4);
    }

    #[test]
    fn test_vertical_hop_has_no_lateral_offset() {
        let path = FlightPath::plan(Vec3::ZERO, Vec3::new(0.0, 80.0, 0.0), 10.0);
        let FlightPath::Lofted(spline) = path else {
            panic!("expected a lofted path");
        };
        assert!(spline.points().iter().all(|p| p.is_finite()));
        assert!(spline.points().iter().all(|p| p.x == 0.0 && p.z == 0.0));
    }

    #[test]
    fn test_arc_length_sampling_is_even() {
        let path = FlightPath::plan(Vec3::ZERO, Vec3::new(200.0, 0.0, 50.0), 60.0);
        let FlightPath::Lofted(spline) = &path else {
            panic!("expected a lofted path");
        };
        let step = spline.length() / 10.0;
        let mut previous = path.sample(0.0);
        for i in 1..=10 {
            let current = path.sample(i as f32 / 10.0);
            let travelled = current.distance(previous);
            assert!((travelled - step).abs() < step * 0.05, "step {i}: {travelled} vs {step}");
            previous = current;
        }
    }

    #[test]
    fn test_nan_parameter_returns_start() {
        let path = FlightPath::plan(Vec3::ONE, Vec3::new(90.0, 0.0, 0.0), 5.0);
        assert_eq!(path.sample(f32::NAN), Vec3::ONE);
    }
}
