//! Procedural spiral-galaxy point cloud.
//!
//! Every particle sits on one of `branches` evenly spaced arms, twisted by
//! `spin` proportionally to its distance from the center, and is pushed off
//! the arm by a per-axis jitter whose distribution is shaped by
//! `randomness_power`. Colors fade from `inside_color` at the core to
//! `outside_color` at `radius`.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::GeometryData;
use crate::material::{Blending, PointsMaterial};
use crate::math::Color;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalaxyParameters {
    pub count: usize,
    pub size: f32,
    pub radius: f32,
    pub branches: usize,
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Color,
    pub outside_color: Color,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Color::from_rgb8(0xff, 0x60, 0x30),
            outside_color: Color::from_rgb8(0x1b, 0x39, 0x84),
        }
    }
}

impl GalaxyParameters {
    /// Additive, depth-write-free point sprites colored per particle
    pub fn points_material(&self) -> PointsMaterial {
        PointsMaterial {
            size: self.size,
            size_attenuation: true,
            depth_write: false,
            blending: Blending::Additive,
            vertex_colors: true,
            color: Color::WHITE,
        }
    }

    fn branch_angle(&self, index: usize) -> f32 {
        if self.branches == 0 {
            return 0.0;
        }
        (index % self.branches) as f32 / self.branches as f32 * TAU
    }

    fn color_fraction(&self, radius: f32) -> f32 {
        if self.radius > 0.0 {
            (radius / self.radius).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub color: Color,
}

/// Generated particles as two parallel backing buffers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleCloud {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl ParticleCloud {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, particle: Particle) {
        self.positions.push(particle.position.to_array());
        self.colors.push(particle.color.to_array());
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn particles(&self) -> impl Iterator<Item = Particle> + '_ {
        self.positions
            .iter()
            .zip(&self.colors)
            .map(|(position, &[r, g, b])| Particle {
                position: Vec3::from_array(*position),
                color: Color::new(r, g, b),
            })
    }

    pub fn to_geometry(&self) -> GeometryData {
        GeometryData::points(self.positions.clone(), self.colors.clone())
    }
}

/// Signed jitter in `[-randomness, randomness]`, concentrated near zero as
/// `power` grows
fn jitter<R: Rng + ?Sized>(rng: &mut R, power: f32, randomness: f32) -> f32 {
    let magnitude = rng.random::<f32>().powf(power);
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    magnitude * sign * randomness
}

/// Build a galaxy cloud from `params`, drawing all randomness from `rng`
pub fn generate<R: Rng + ?Sized>(params: &GalaxyParameters, rng: &mut R) -> ParticleCloud {
    let mut cloud = ParticleCloud::with_capacity(params.count);

    for i in 0..params.count {
        // Non-positive radii collapse every arm onto the core
        let radius = rng.random::<f32>() * params.radius.max(0.0);
        let angle = params.branch_angle(i) + radius * params.spin;

        let offset = Vec3::new(
            jitter(rng, params.randomness_power, params.randomness),
            jitter(rng, params.randomness_power, params.randomness),
            jitter(rng, params.randomness_power, params.randomness),
        );

        let position = Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius) + offset;
        let color = params
            .inside_color
            .lerp(params.outside_color, params.color_fraction(radius));

        cloud.push(Particle { position, color });
    }

    cloud
}
