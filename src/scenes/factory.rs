use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

use crate::camera::Camera;
use crate::core::{Prop, Scene};
use crate::frame::FrameInfo;
use crate::geometry::{box_geometry, cylinder_geometry, plane_geometry, sphere_geometry};
use crate::material::StandardMaterial;
use crate::math::{Color, Transform};
use crate::traits::SceneProvider;

pub const SMOKE_PUFFS: usize = 8;
/// Puffs rising above this height go back to the chimney
pub const SMOKE_RESET_HEIGHT: f32 = 5.0;
/// Upper bound of the per-axis drift each tick
pub const SMOKE_MAX_DRIFT: f32 = 0.03;

const FLOOR_HEIGHT: f32 = 0.25;
const WALLS_HEIGHT: f32 = 1.5;
const CHIMNEY_RADIUS: f32 = 0.25;
const CHIMNEY_HEIGHT: f32 = 2.0;
const SMOKE_RADIUS: f32 = 0.25;

/// Chimney tops, where every puff is emitted
pub fn smoke_origin() -> Vec3 {
    Vec3::new(0.0, WALLS_HEIGHT + CHIMNEY_HEIGHT, 0.0)
}

/// One tick of smoke motion
///
/// A puff above the reset height returns to its origin; otherwise it rises
/// and drifts towards -x and -z by independent amounts in
/// `[0, SMOKE_MAX_DRIFT)`.
pub fn drift_smoke<R: Rng + ?Sized>(prop: &mut Prop, rng: &mut R) {
    if prop.position().y > SMOKE_RESET_HEIGHT {
        prop.reset_to_origin();
        return;
    }

    let translation = &mut prop.transform.translation;
    translation.y += rng.random_range(0.0..SMOKE_MAX_DRIFT);
    translation.x -= rng.random_range(0.0..SMOKE_MAX_DRIFT);
    translation.z -= rng.random_range(0.0..SMOKE_MAX_DRIFT);
}

fn color(hex: u32) -> Color {
    Color::from_rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// A small factory whose chimneys puff drifting smoke
pub struct FactoryScene {
    rng: StdRng,
}

impl FactoryScene {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl SceneProvider for FactoryScene {
    fn name(&self) -> &str {
        "Mini Factory"
    }

    fn camera(&self) -> Camera {
        Camera::new(Vec3::new(7.0, 3.0, 5.0), Vec3::ZERO)
    }

    fn build(&mut self, scene: &mut Scene<'_>) {
        let walls = scene.install(
            box_geometry(3.0, WALLS_HEIGHT, 1.5),
            StandardMaterial::new(color(0x4c70f3)),
        );
        scene.set_transform(
            walls,
            Transform::from_translation(Vec3::new(0.0, WALLS_HEIGHT / 2.0, 0.0)),
        );

        scene.add_fixture(
            plane_geometry(20.0, 20.0),
            StandardMaterial::new(color(0x1a4ce0)),
            Transform::from_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
        );
        scene.add_fixture(
            box_geometry(4.0, FLOOR_HEIGHT, 3.0),
            StandardMaterial::new(color(0xe3e8f3)),
            Transform::from_translation(Vec3::new(0.0, FLOOR_HEIGHT / 2.0, 0.0)),
        );

        let chimney_y = WALLS_HEIGHT + CHIMNEY_HEIGHT / 2.0;
        for x in [-1.0, 0.0, 1.0] {
            scene.add_fixture(
                cylinder_geometry(CHIMNEY_RADIUS, CHIMNEY_RADIUS, CHIMNEY_HEIGHT, 32),
                StandardMaterial::new(color(0x8098ea)),
                Transform::from_translation(Vec3::new(x, chimney_y, 0.0)),
            );
        }

        for _ in 0..SMOKE_PUFFS {
            scene.add_prop(
                sphere_geometry(SMOKE_RADIUS, 32, 16),
                StandardMaterial::new(Color::WHITE),
                smoke_origin(),
            );
        }
    }

    fn animate(&mut self, scene: &mut Scene<'_>, _frame: &FrameInfo) {
        scene.update_props(|prop| drift_smoke(prop, &mut self.rng));
    }
}
