// SPDX-License-Identifier: MIT OR Apache-2.0
//! Authored camera viewpoints.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use storycam_flight::CameraPose;

/// Rotation of a keyframe as authored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyframeRotation {
    /// Quaternion `[x, y, z, w]`
    Quaternion([f32; 4]),
    /// Euler angles in radians, XYZ order
    Euler([f32; 3]),
}

impl KeyframeRotation {
    /// Convert to a unit quaternion. Degenerate quaternions become identity.
    pub fn to_quat(self) -> Quat {
        match self {
            Self::Quaternion(q) => {
                let quat = Quat::from_array(q);
                if quat.length_squared() > f32::EPSILON {
                    quat.normalize()
                } else {
                    Quat::IDENTITY
                }
            }
            Self::Euler([x, y, z]) => Quat::from_euler(EulerRot::XYZ, x, y, z),
        }
    }
}

impl From<Quat> for KeyframeRotation {
    fn from(quat: Quat) -> Self {
        Self::Quaternion(quat.to_array())
    }
}

/// A single authored pose sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionKeyframe {
    /// Time in seconds, local to the projection
    #[serde(default)]
    pub time: f32,
    /// Camera position
    pub position: Vec3,
    /// Camera rotation
    pub rotation: KeyframeRotation,
    /// Vertical field of view (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f32>,
    /// Far clipping plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub far: Option<f32>,
    /// Markdown shown in the context panel from this keyframe on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ProjectionKeyframe {
    /// Create a keyframe
    pub fn new(time: f32, position: Vec3, rotation: Quat) -> Self {
        Self {
            time,
            position,
            rotation: rotation.into(),
            fov: None,
            far: None,
            context: None,
        }
    }

    /// Set the field of view
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = Some(fov);
        self
    }

    /// Set the context text
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Pose stored in this keyframe
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            orientation: self.rotation.to_quat(),
            field_of_view: self.fov,
        }
    }
}

/// An authored camera viewpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    /// Unique projection id
    pub id: String,
    /// Whether the viewer may offer this projection for explicit selection
    #[serde(default)]
    pub camera_selectable: bool,
    /// Keyframes ordered by time
    #[serde(default)]
    pub keyframes: Vec<ProjectionKeyframe>,
}

impl Projection {
    /// Create an empty projection
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            camera_selectable: true,
            keyframes: Vec::new(),
        }
    }

    /// Set whether the projection is selectable
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.camera_selectable = selectable;
        self
    }

    /// Add a keyframe, keeping keyframes ordered
    pub fn with_keyframe(mut self, keyframe: ProjectionKeyframe) -> Self {
        self.keyframes.push(keyframe);
        self.sort_keyframes();
        self
    }

    /// Sort keyframes by time, keeping authored order for ties
    pub fn sort_keyframes(&mut self) {
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Pose of the first keyframe, the entry point for flights
    pub fn entry_pose(&self) -> Option<CameraPose> {
        self.keyframes.first().map(ProjectionKeyframe::pose)
    }

    /// Time of the last keyframe
    pub fn duration(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    /// Evaluate the pose at a local time.
    ///
    /// Before the first keyframe the first pose holds, after the last the
    /// last pose holds.
    pub fn pose_at(&self, time: f32) -> Option<CameraPose> {
        let next_idx = self.keyframes.iter().position(|k| k.time >= time);

        match next_idx {
            None => self.keyframes.last().map(ProjectionKeyframe::pose),
            Some(0) => self.keyframes.first().map(ProjectionKeyframe::pose),
            Some(idx) => {
                let a = &self.keyframes[idx - 1];
                let b = &self.keyframes[idx];
                if (b.time - a.time).abs() < 0.0001 {
                    return Some(b.pose());
                }
                let t = (time - a.time) / (b.time - a.time);
                Some(a.pose().interpolate(&b.pose(), t))
            }
        }
    }

    /// Context text of the latest keyframe at or before `time`
    pub fn context_at(&self, time: f32) -> Option<&str> {
        self.keyframes
            .iter()
            .rev()
            .find(|k| k.time <= time)
            .or_else(|| self.keyframes.first())
            .and_then(|k| k.context.as_deref())
    }
}
