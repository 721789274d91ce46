use glam::Vec3;

use super::resources::{Prop, ResourceSet, ResourceSlot};
use crate::galaxy::ParticleCloud;
use crate::geometry::GeometryData;
use crate::material::{MaterialConfig, PointsMaterial};
use crate::math::Transform;
use crate::traits::{RenderEngine, RenderableHandle};

/// Explicit scene context: the engine plus the resources the scene owns
///
/// Scene providers only reach the engine through this type, so everything
/// they create is recorded in the `ResourceSet` and released on teardown.
pub struct Scene<'a> {
    engine: &'a mut dyn RenderEngine,
    resources: &'a mut ResourceSet,
}

impl<'a> Scene<'a> {
    pub fn new(engine: &'a mut dyn RenderEngine, resources: &'a mut ResourceSet) -> Self {
        Self { engine, resources }
    }

    pub fn resources(&self) -> &ResourceSet {
        self.resources
    }

    pub fn primary(&self) -> Option<RenderableHandle> {
        self.resources.primary().map(|slot| slot.renderable)
    }

    /// Swap in a new primary renderable
    ///
    /// The new resources are built first, the old renderable is detached and
    /// its resources disposed, then the new renderable is attached. At most
    /// one primary renderable is attached at any point.
    pub fn install(
        &mut self,
        geometry: GeometryData,
        material: impl Into<MaterialConfig>,
    ) -> RenderableHandle {
        let vertices = geometry.vertex_count();
        let slot = ResourceSlot::create(&mut *self.engine, geometry, material.into());

        if let Some(old) = self.resources.replace_primary(slot) {
            log::debug!("Releasing previous renderable {:?}", old.renderable);
            old.release(&mut *self.engine);
        }

        self.engine.attach(slot.renderable);
        log::debug!(
            "Installed renderable {:?} ({} vertices)",
            slot.renderable,
            vertices
        );
        slot.renderable
    }

    /// `install` a particle cloud as point sprites
    pub fn install_cloud(
        &mut self,
        cloud: &ParticleCloud,
        material: PointsMaterial,
    ) -> RenderableHandle {
        self.install(cloud.to_geometry(), material)
    }

    /// Add static scenery, attached immediately
    pub fn add_fixture(
        &mut self,
        geometry: GeometryData,
        material: impl Into<MaterialConfig>,
        transform: Transform,
    ) -> RenderableHandle {
        let slot = ResourceSlot::create(&mut *self.engine, geometry, material.into());
        self.engine.set_transform(slot.renderable, transform);
        self.engine.attach(slot.renderable);
        self.resources.push_fixture(slot);
        slot.renderable
    }

    /// Add an animated prop placed at its emission origin; returns its index
    pub fn add_prop(
        &mut self,
        geometry: GeometryData,
        material: impl Into<MaterialConfig>,
        origin: Vec3,
    ) -> usize {
        let slot = ResourceSlot::create(&mut *self.engine, geometry, material.into());
        let transform = Transform::from_translation(origin);
        self.engine.set_transform(slot.renderable, transform);
        self.engine.attach(slot.renderable);
        self.resources.push_prop(Prop {
            slot,
            transform,
            origin,
        })
    }

    pub fn props(&self) -> &[Prop] {
        self.resources.props()
    }

    /// Run `update` on every prop and push the resulting transforms
    pub fn update_props(&mut self, mut update: impl FnMut(&mut Prop)) {
        for prop in self.resources.props_mut() {
            update(prop);
            self.engine.set_transform(prop.slot.renderable, prop.transform);
        }
    }

    pub fn set_transform(&mut self, renderable: RenderableHandle, transform: Transform) {
        self.engine.set_transform(renderable, transform);
    }
}
