//! Camera choreography along two blended Lissajous-style curves.
//!
//! The pose is recomputed from scratch every frame from wall-clock time and
//! the current bass sample; there is no smoothing state.

use crate::constants::*;
use glam::{Mat4, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov_degrees: f32,
}

/// `(sin(a t) cos(b t), sin(b t) cos(c t), sin(c t) cos(a t))` for `freq = (a, b, c)`.
#[inline]
pub fn lissajous(freq: Vec3, t: f32) -> Vec3 {
    let (a, b, c) = (freq.x * t, freq.y * t, freq.z * t);
    Vec3::new(a.sin() * b.cos(), b.sin() * c.cos(), c.sin() * a.cos())
}

#[inline]
pub fn field_of_view(bass: f32) -> f32 {
    CAMERA_BASE_FOV_DEG + bass * CAMERA_BASS_FOV_DEG
}

pub fn choreograph(time: f32, bass: f32) -> CameraPose {
    let radius = CAMERA_BASE_RADIUS + bass * CAMERA_BASS_RADIUS;
    let blend = lissajous(CAMERA_PRIMARY_FREQ, time) * CAMERA_PRIMARY_WEIGHT
        + lissajous(CAMERA_SECONDARY_FREQ, time) * CAMERA_SECONDARY_WEIGHT;
    let offset = CAMERA_OFFSET + Vec3::Y * (bass * CAMERA_BASS_LIFT);
    CameraPose {
        position: blend * radius + offset,
        look_at: lissajous(CAMERA_LOOK_FREQ, time) * CAMERA_LOOK_RADIUS,
        fov_degrees: field_of_view(bass),
    }
}

/// Reflection across the horizontal plane `y = plane_y`.
pub fn mirror_matrix(plane_y: f32) -> Mat4 {
    Mat4::from_translation(Vec3::Y * plane_y)
        * Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0))
        * Mat4::from_translation(Vec3::Y * -plane_y)
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 15.0, 30.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy_radians: CAMERA_BASE_FOV_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

impl Camera {
    pub fn apply(&mut self, pose: &CameraPose) {
        self.eye = pose.position;
        self.target = pose.look_at;
        self.fovy_radians = pose.fov_degrees.to_radians();
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    #[inline]
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// View-projection that draws the world mirrored in `y = plane_y`, as seen
    /// from this camera. Screen positions line up with [`Camera::view_proj`] on
    /// the plane itself.
    pub fn mirrored_view_proj(&self, plane_y: f32) -> Mat4 {
        self.view_proj() * mirror_matrix(plane_y)
    }

    /// Eye position reflected below the mirror plane.
    pub fn mirrored_eye(&self, plane_y: f32) -> Vec3 {
        Vec3::new(self.eye.x, 2.0 * plane_y - self.eye.y, self.eye.z)
    }
}
