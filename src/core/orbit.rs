//! Damped orbit controls.
//!
//! The camera orbits `target` on a sphere. Pointer drags and wheel steps feed
//! a spherical velocity; each update applies a fraction of it and decays the
//! rest, so the camera keeps gliding for a few frames after input stops.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use winit::event::WindowEvent;

use super::input_adapter::PointerInput;
use crate::camera::Camera;
use crate::traits::{InteractionControls, SurfaceTarget};

pub const DAMPING_FACTOR: f32 = 0.05;
/// Distance multiplier per wheel line
const ZOOM_STEP: f32 = 0.95;
/// Keeps the polar angle off the poles where `up` degenerates
const POLE_EPSILON: f32 = 1e-4;
/// Below this the remaining velocity is dropped
const REST_THRESHOLD: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Vec3,
    theta_velocity: f32,
    phi_velocity: f32,
    scale: f32,
    damping: bool,
    damping_factor: f32,
    min_distance: f32,
    max_distance: f32,
    /// Viewport height in physical pixels; a full-height drag is one turn
    viewport_height: f32,
    pointer: PointerInput,
}

impl OrbitControls {
    pub fn new(camera: &Camera, surface: &SurfaceTarget) -> Self {
        Self {
            target: camera.target,
            theta_velocity: 0.0,
            phi_velocity: 0.0,
            scale: 1.0,
            damping: true,
            damping_factor: DAMPING_FACTOR,
            min_distance: camera.near,
            max_distance: camera.far,
            viewport_height: Self::physical_height(surface),
            pointer: PointerInput::new(),
        }
    }

    fn physical_height(surface: &SurfaceTarget) -> f32 {
        (surface.height as f32 * surface.pixel_ratio as f32).max(1.0)
    }

    pub fn with_damping(mut self, enabled: bool) -> Self {
        self.damping = enabled;
        self
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn resize(&mut self, surface: &SurfaceTarget) {
        self.viewport_height = Self::physical_height(surface);
    }

    /// Feed a window event; returns true if it was consumed
    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        self.pointer.process_event(event)
    }

    pub fn pointer_mut(&mut self) -> &mut PointerInput {
        &mut self.pointer
    }

    /// Orbit horizontally by `angle` radians
    pub fn rotate_left(&mut self, angle: f32) {
        self.theta_velocity -= angle;
    }

    /// Orbit vertically by `angle` radians
    pub fn rotate_up(&mut self, angle: f32) {
        self.phi_velocity -= angle;
    }

    /// Scale the orbit distance, `< 1` moves closer
    pub fn dolly(&mut self, factor: f32) {
        self.scale *= factor;
    }

    pub fn is_idle(&self) -> bool {
        self.theta_velocity.abs() < REST_THRESHOLD
            && self.phi_velocity.abs() < REST_THRESHOLD
            && self.scale == 1.0
    }

    fn consume_pointer(&mut self) {
        let drag = self.pointer.take_drag();
        if drag != glam::Vec2::ZERO {
            self.rotate_left(TAU * drag.x / self.viewport_height);
            self.rotate_up(TAU * drag.y / self.viewport_height);
        }

        let lines = self.pointer.take_scroll();
        if lines != 0.0 {
            self.dolly(ZOOM_STEP.powf(lines));
        }
    }
}

impl InteractionControls for OrbitControls {
    fn update(&mut self, camera: &mut Camera) {
        self.consume_pointer();
        if self.is_idle() {
            self.theta_velocity = 0.0;
            self.phi_velocity = 0.0;
            return;
        }

        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let step = if self.damping { self.damping_factor } else { 1.0 };
        theta += self.theta_velocity * step;
        phi = (phi + self.phi_velocity * step).clamp(POLE_EPSILON, PI - POLE_EPSILON);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let sin_phi = phi.sin();
        camera.position = self.target
            + Vec3::new(
                radius * sin_phi * theta.sin(),
                radius * phi.cos(),
                radius * sin_phi * theta.cos(),
            );
        camera.target = self.target;

        if self.damping {
            self.theta_velocity *= 1.0 - self.damping_factor;
            self.phi_velocity *= 1.0 - self.damping_factor;
        } else {
            self.theta_velocity = 0.0;
            self.phi_velocity = 0.0;
        }
        self.scale = 1.0;
    }
}
