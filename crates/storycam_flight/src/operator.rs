// SPDX-License-Identifier: MIT OR Apache-2.0
//! The live camera a flight drives.
//!
//! Rendering engines expose their camera and orbit controller through
//! [`CameraOperator`]. Flights never create or dispose an operator; they only
//! hold a [`WeakOperator`] and mutate it while they are live.

use glam::{Mat4, Quat, Vec3};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Handle to a rendering engine's camera and orbit controller
pub trait CameraOperator {
    /// Camera position
    fn position(&self) -> Vec3;
    /// Move the camera
    fn set_position(&mut self, position: Vec3);
    /// Camera orientation
    fn orientation(&self) -> Quat;
    /// Rotate the camera
    fn set_orientation(&mut self, orientation: Quat);
    /// Vertical field of view in degrees, `None` for cameras without one
    fn field_of_view(&self) -> Option<f32>;
    /// Change the field of view; takes effect after [`Self::update_projection`]
    fn set_field_of_view(&mut self, degrees: f32);
    /// Recompute the projection after a field-of-view change
    fn update_projection(&mut self);
    /// Point the orbit controller rotates around
    fn controller_target(&self) -> Vec3;
    /// Move the orbit target
    fn set_controller_target(&mut self, target: Vec3);
    /// Whether the controller accepts user input
    fn controller_enabled(&self) -> bool;
    /// Enable or disable user input
    fn set_controller_enabled(&mut self, enabled: bool);
    /// Resync the controller after its target or the camera moved
    fn update_controller(&mut self);
}

/// Shared ownership of a live operator
pub type SharedOperator = Arc<Mutex<dyn CameraOperator + Send>>;

/// Non-owning operator handle; fails to upgrade once the host tears it down
pub type WeakOperator = Weak<Mutex<dyn CameraOperator + Send>>;

/// Wrap an operator for sharing with flights.
pub fn share<O: CameraOperator + Send + 'static>(operator: O) -> SharedOperator {
    Arc::new(Mutex::new(operator))
}

/// Exclusive use of the orbit controller for the duration of a flight.
///
/// Acquiring disables user input; dropping re-enables it, whatever the exit
/// path.
#[derive(Debug)]
pub struct ControlLease {
    operator: WeakOperator,
}

impl ControlLease {
    /// Disable the controller. Returns `None` if the operator is gone.
    pub fn acquire(operator: &WeakOperator) -> Option<Self> {
        let live = operator.upgrade()?;
        live.lock().set_controller_enabled(false);
        Some(Self {
            operator: operator.clone(),
        })
    }
}

impl Drop for ControlLease {
    fn drop(&mut self) {
        if let Some(live) = self.operator.upgrade() {
            live.lock().set_controller_enabled(true);
        }
    }
}

/// Perspective camera with a cached projection matrix
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera orientation in world space
    pub orientation: Quat,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    /// Create a camera at the origin looking down `-Z`
    pub fn new(aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            fov_degrees: 50.0,
            aspect_ratio,
            near: 0.1,
            far: 2000.0,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Recompute the projection matrix
    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        );
    }

    /// Projection matrix as of the last [`Self::update_projection`]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

/// Orbit-style controller state
#[derive(Debug, Clone)]
pub struct OrbitController {
    /// Point the camera orbits
    pub target: Vec3,
    /// Whether user input is accepted
    pub enabled: bool,
    /// Distance from camera to target as of the last update
    pub radius: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            target: Vec3::NEG_Z * 10.0,
            enabled: true,
            radius: 10.0,
        }
    }
}

/// In-memory camera and controller, used by headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct CameraRig {
    /// The camera
    pub camera: PerspectiveCamera,
    /// The orbit controller
    pub controller: OrbitController,
    /// Number of projection recomputations
    pub projection_updates: u32,
}

impl CameraOperator for CameraRig {
    fn position(&self) -> Vec3 {
        self.camera.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.camera.position = position;
    }

    fn orientation(&self) -> Quat {
        self.camera.orientation
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.camera.orientation = orientation;
    }

    fn field_of_view(&self) -> Option<f32> {
        Some(self.camera.fov_degrees)
    }

    fn set_field_of_view(&mut self, degrees: f32) {
        self.camera.fov_degrees = degrees;
    }

    fn update_projection(&mut self) {
        self.camera.update_projection();
        self.projection_updates += 1;
    }

    fn controller_target(&self) -> Vec3 {
        self.controller.target
    }

    fn set_controller_target(&mut self, target: Vec3) {
        self.controller.target = target;
    }

    fn controller_enabled(&self) -> bool {
        self.controller.enabled
    }

    fn set_controller_enabled(&mut self, enabled: bool) {
        self.controller.enabled = enabled;
    }

    fn update_controller(&mut self) {
        self.controller.radius = self.camera.position.distance(self.controller.target);
    }
}
