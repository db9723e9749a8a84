// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera pose snapshots.

use crate::operator::CameraOperator;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Degrees added to an incoming field of view before clamping.
///
/// Tuned by eye; treat it as a heuristic rather than a model.
pub const SAFE_FOV_BIAS: f32 = 28.0;
/// Narrowest widened field of view (degrees)
pub const SAFE_FOV_MIN: f32 = 78.0;
/// Widest widened field of view (degrees)
pub const SAFE_FOV_MAX: f32 = 112.0;

/// Immutable snapshot of a camera's pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// World-space position
    pub position: Vec3,
    /// World-space orientation
    pub orientation: Quat,
    /// Vertical field of view in degrees, if the camera has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_view: Option<f32>,
}

impl CameraPose {
    /// Create a pose without a field of view
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            field_of_view: None,
        }
    }

    /// Set the field of view (degrees)
    pub fn with_field_of_view(mut self, degrees: f32) -> Self {
        self.field_of_view = Some(degrees);
        self
    }

    /// Forward direction (`-Z` rotated by the orientation)
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Point an orbit controller should rotate around, `distance` units ahead.
    pub fn look_target(&self, distance: f32) -> Vec3 {
        self.position + self.forward() * distance
    }

    /// Straight-line distance between two poses
    pub fn distance_to(&self, other: &CameraPose) -> f32 {
        self.position.distance(other.position)
    }

    /// Blend towards `other`: linear position and field of view, spherical
    /// orientation. A field of view defined on only one side is kept as is.
    pub fn interpolate(&self, other: &CameraPose, t: f32) -> CameraPose {
        let field_of_view = match (self.field_of_view, other.field_of_view) {
            (Some(a), Some(b)) => Some(crate::easing::lerp(a, b, t)),
            (a, b) => a.or(b),
        };
        CameraPose {
            position: self.position.lerp(other.position, t),
            orientation: self.orientation.slerp(other.orientation, t).normalize(),
            field_of_view,
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// Read the current pose of a live camera.
pub fn sample_pose(operator: &dyn CameraOperator) -> CameraPose {
    CameraPose {
        position: operator.position(),
        orientation: operator.orientation(),
        field_of_view: operator.field_of_view(),
    }
}

/// Widen an authored field of view for flying into a projection.
pub fn safe_field_of_view(incoming: f32) -> f32 {
    (incoming + SAFE_FOV_BIAS).clamp(SAFE_FOV_MIN, SAFE_FOV_MAX)
}
