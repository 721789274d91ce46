use glam::Vec3;

use crate::camera::Camera;
use crate::core::Scene;
use crate::geometry::{axes_geometry, box_geometry};
use crate::material::{LineMaterial, StandardMaterial};
use crate::math::{Color, Transform};
use crate::traits::SceneProvider;

/// Wireframe box over an axes helper
pub struct StarterScene;

impl SceneProvider for StarterScene {
    fn name(&self) -> &str {
        "Starter"
    }

    fn camera(&self) -> Camera {
        Camera::new(Vec3::new(4.0, 2.0, 5.0), Vec3::ZERO)
    }

    fn build(&mut self, scene: &mut Scene<'_>) {
        scene.install(
            box_geometry(4.0, 2.5, 4.0),
            StandardMaterial::wireframe(Color::from_rgb8(0xff, 0x00, 0xff)),
        );
        scene.add_fixture(
            axes_geometry(5.0),
            LineMaterial {
                color: Color::WHITE,
                vertex_colors: true,
            },
            Transform::IDENTITY,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HeadlessEngine, ResourceSet};
    use crate::material::MaterialConfig;

    #[test]
    fn test_starter_has_box_and_axes() {
        let mut engine = HeadlessEngine::new();
        let mut resources = ResourceSet::new();
        StarterScene.build(&mut Scene::new(&mut engine, &mut resources));

        let primary = resources.primary().unwrap().renderable;
        assert!(matches!(
            engine.material_of(primary),
            Some(MaterialConfig::Standard(StandardMaterial { wireframe: true, .. }))
        ));
        assert_eq!(resources.fixtures().len(), 1);
        assert_eq!(engine.attached().len(), 2);
    }
}
