use glam::{Mat4, Vec3};

use crate::types::CameraUniform;

pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 100.0;

/// Perspective camera looking at `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y_degrees: DEFAULT_FOV_DEGREES,
            aspect: 1.0,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    pub fn with_aspect(mut self, width: u32, height: u32) -> Self {
        self.set_aspect(width, height);
        self
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Projection with wgpu's [0, 1] depth range
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn to_uniform(&self, viewport: [f32; 2], pixel_ratio: f32) -> CameraUniform {
        CameraUniform {
            view: self.view_matrix().to_cols_array_2d(),
            projection: self.projection_matrix().to_cols_array_2d(),
            viewport: [viewport[0], viewport[1], pixel_ratio, 0.0],
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(Vec3::new(4.0, 2.0, 5.0), Vec3::ZERO)
    }
}
