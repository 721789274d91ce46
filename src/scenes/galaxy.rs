use glam::Vec3;
use rand::rngs::StdRng;

use crate::camera::Camera;
use crate::core::Scene;
use crate::frame::FrameInfo;
use crate::galaxy::{self, GalaxyParameters};
use crate::math::{Color, Transform};
use crate::traits::{RenderableHandle, SceneProvider};

/// Spin about the vertical axis per tick, in radians
pub const ROTATION_PER_FRAME: f32 = 0.001;

/// The spinning procedural galaxy
pub struct GalaxyScene {
    params: GalaxyParameters,
    rng: StdRng,
    rotation: f32,
    points: Option<RenderableHandle>,
}

impl GalaxyScene {
    pub fn new(params: GalaxyParameters, rng: StdRng) -> Self {
        Self {
            params,
            rng,
            rotation: 0.0,
            points: None,
        }
    }

    pub fn parameters(&self) -> &GalaxyParameters {
        &self.params
    }

    /// Takes effect on the next `rebuild`
    pub fn set_parameters(&mut self, params: GalaxyParameters) {
        self.params = params;
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn points(&self) -> Option<RenderableHandle> {
        self.points
    }

    fn transform(&self) -> Transform {
        Transform::from_rotation(Vec3::new(0.0, self.rotation, 0.0))
    }

    /// Generate a fresh cloud and swap it in; the spin carries over
    fn regenerate(&mut self, scene: &mut Scene<'_>) {
        let cloud = galaxy::generate(&self.params, &mut self.rng);
        let handle = scene.install_cloud(&cloud, self.params.points_material());
        scene.set_transform(handle, self.transform());
        self.points = Some(handle);
        log::info!(
            "Galaxy generated: {} particles, {} branches",
            cloud.len(),
            self.params.branches
        );
    }
}

fn color_edit(ui: &mut egui::Ui, label: &str, color: &mut Color) -> bool {
    let mut rgb = color.to_array();
    let response = ui
        .horizontal(|ui| {
            ui.label(label);
            ui.color_edit_button_rgb(&mut rgb)
        })
        .inner;
    if response.changed() {
        *color = Color::new(rgb[0], rgb[1], rgb[2]);
    }
    commit(&response)
}

/// A slider commits once released; clicks and keyboard edits commit at once
fn commit(response: &egui::Response) -> bool {
    response.drag_stopped() || (response.changed() && !response.dragged())
}

impl SceneProvider for GalaxyScene {
    fn name(&self) -> &str {
        "Galaxy"
    }

    fn camera(&self) -> Camera {
        Camera::new(Vec3::new(4.0, 2.0, 5.0), Vec3::ZERO)
    }

    fn build(&mut self, scene: &mut Scene<'_>) {
        self.regenerate(scene);
    }

    fn animate(&mut self, scene: &mut Scene<'_>, _frame: &FrameInfo) {
        self.rotation += ROTATION_PER_FRAME;
        if let Some(points) = self.points {
            scene.set_transform(points, self.transform());
        }
    }

    fn parameter_ui(&mut self, ui: &mut egui::Ui) -> bool {
        let params = &mut self.params;
        let mut changed = false;

        changed |= commit(&ui.add(
            egui::Slider::new(&mut params.count, 100..=1_000_000)
                .logarithmic(true)
                .text("count"),
        ));
        changed |= commit(&ui.add(
            egui::Slider::new(&mut params.size, 0.001..=0.1)
                .logarithmic(true)
                .text("size"),
        ));
        changed |= commit(&ui.add(egui::Slider::new(&mut params.radius, 0.01..=20.0).text("radius")));
        changed |= commit(&ui.add(egui::Slider::new(&mut params.branches, 2..=20).text("branches")));
        changed |= commit(&ui.add(egui::Slider::new(&mut params.spin, -5.0..=5.0).text("spin")));
        changed |= commit(&ui.add(
            egui::Slider::new(&mut params.randomness, 0.0..=2.0).text("randomness"),
        ));
        changed |= commit(&ui.add(
            egui::Slider::new(&mut params.randomness_power, 1.0..=10.0).text("randomness power"),
        ));
        changed |= color_edit(ui, "inside", &mut params.inside_color);
        changed |= color_edit(ui, "outside", &mut params.outside_color);

        changed
    }

    fn rebuild(&mut self, scene: &mut Scene<'_>) {
        self.regenerate(scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HeadlessEngine, ResourceSet};
    use crate::material::{Blending, MaterialConfig};
    use rand::SeedableRng;

    fn small_scene() -> GalaxyScene {
        let params = GalaxyParameters {
            count: 500,
            ..Default::default()
        };
        GalaxyScene::new(params, StdRng::seed_from_u64(5))
    }

    #[test]
    fn test_build_installs_additive_points() {
        let mut engine = HeadlessEngine::new();
        let mut resources = ResourceSet::new();
        let mut galaxy = small_scene();

        galaxy.build(&mut Scene::new(&mut engine, &mut resources));

        let points = galaxy.points().unwrap();
        assert_eq!(engine.vertex_count_of(points), Some(500));
        match engine.material_of(points) {
            Some(MaterialConfig::Points(material)) => {
                assert_eq!(material.blending, Blending::Additive);
                assert!(!material.depth_write);
                assert!(material.vertex_colors);
            }
            other => panic!("unexpected material {other:?}"),
        }
    }

    #[test]
    fn test_animate_spins_about_y() {
        let mut engine = HeadlessEngine::new();
        let mut resources = ResourceSet::new();
        let mut galaxy = small_scene();
        let mut scene = Scene::new(&mut engine, &mut resources);
        galaxy.build(&mut scene);

        for number in 0..10 {
            galaxy.animate(&mut scene, &FrameInfo::new(number, 0.0, 0.016));
        }
        drop(scene);

        assert!((galaxy.rotation() - 0.01).abs() < 1e-6);
        let transform = engine.transform_of(galaxy.points().unwrap()).unwrap();
        assert!((transform.rotation.y - 0.01).abs() < 1e-6);
        assert_eq!(transform.rotation.x, 0.0);
    }

    #[test]
    fn test_rebuild_replaces_points_and_keeps_spin() {
        let mut engine = HeadlessEngine::new();
        let mut resources = ResourceSet::new();
        let mut galaxy = small_scene();
        let mut scene = Scene::new(&mut engine, &mut resources);
        galaxy.build(&mut scene);
        galaxy.animate(&mut scene, &FrameInfo::new(0, 0.0, 0.016));
        let first = galaxy.points().unwrap();

        galaxy.set_parameters(GalaxyParameters {
            count: 20,
            ..*galaxy.parameters()
        });
        galaxy.rebuild(&mut scene);
        drop(scene);

        let second = galaxy.points().unwrap();
        assert_ne!(first, second);
        assert_eq!(engine.attached(), &[second]);
        assert_eq!(engine.vertex_count_of(second), Some(20));
        let spin = engine.transform_of(second).unwrap().rotation.y;
        assert!((spin - ROTATION_PER_FRAME).abs() < 1e-6);
    }
}
