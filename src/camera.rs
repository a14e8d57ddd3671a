//! Damped orbit camera for the Saturn scene.

use glam::{Mat4, Vec2, Vec3};

/// Orbit camera with inertial drag.
///
/// Dragging adds angular velocity; every [`update`](Self::update) applies a
/// `damping` fraction of it and bleeds the same fraction off, so motion
/// eases out after the pointer is released.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub damping: f32,
    velocity: Vec2,
}

impl OrbitCamera {
    const PITCH_LIMIT: f32 = 1.5;

    pub fn new(distance: f32, fov: f32, damping: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance,
            target: Vec3::ZERO,
            fov,
            damping,
            velocity: Vec2::ZERO,
        }
    }

    /// Queue an orbit of `delta` radians (yaw, pitch).
    pub fn rotate(&mut self, delta: Vec2) {
        self.velocity += delta;
    }

    /// Apply damped motion for one tick.
    pub fn update(&mut self) {
        let step = self.velocity * self.damping;
        self.yaw += step.x;
        self.pitch = (self.pitch + step.y).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.velocity *= 1.0 - self.damping;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// World position of the camera.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect.max(1e-3), 0.1, 1000.0)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view_matrix()
    }
}
