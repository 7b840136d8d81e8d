//! Perspective camera
//!
//! Sits at z = 5 looking down -z into the star field. Scroll velocity widens
//! the field of view for a speed-rush effect.

use glam::{Mat4, Vec3};

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Current vertical field of view (degrees)
    pub fov_deg: f32,
    /// Field of view at rest (degrees)
    pub base_fov_deg: f32,
    /// Width / height of the drawing surface
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_deg: BASE_FOV_DEG,
            base_fov_deg: BASE_FOV_DEG,
            aspect: sanitize_aspect(aspect),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
        }
    }

    /// fov = base + velocity * gain, capped so the projection never inverts
    pub fn apply_velocity(&mut self, velocity: f32) {
        let velocity = if velocity.is_finite() { velocity.max(0.0) } else { 0.0 };
        self.fov_deg = (self.base_fov_deg + velocity * FOV_VELOCITY_GAIN)
            .clamp(self.base_fov_deg, MAX_FOV_DEG);
    }

    /// Update aspect ratio for a new surface size (ignores degenerate sizes)
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.eye)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Project a world point to normalized device coordinates
    ///
    /// Returns None for points behind the eye.
    pub fn project(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.view_proj() * world.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 }
}
