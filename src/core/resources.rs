use glam::Vec3;

use crate::geometry::GeometryData;
use crate::material::MaterialConfig;
use crate::math::Transform;
use crate::traits::{GeometryHandle, MaterialHandle, RenderEngine, RenderableHandle};

/// One drawable: its geometry, its material and the renderable binding them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSlot {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub renderable: RenderableHandle,
}

impl ResourceSlot {
    /// Engine resources held by one slot
    pub const RESOURCE_COUNT: usize = 3;

    /// Allocate geometry, material and renderable; nothing is attached yet
    pub fn create(
        engine: &mut dyn RenderEngine,
        geometry: GeometryData,
        material: MaterialConfig,
    ) -> Self {
        let geometry = engine.create_geometry(geometry);
        let material = engine.create_material(material);
        let renderable = engine.create_renderable(geometry, material);
        Self {
            geometry,
            material,
            renderable,
        }
    }

    /// Detach the renderable, then dispose renderable, geometry and material
    ///
    /// Consumes the slot so a released slot cannot be released again.
    pub fn release(self, engine: &mut dyn RenderEngine) {
        engine.detach(self.renderable);
        engine.dispose(self.renderable.into());
        engine.dispose(self.geometry.into());
        engine.dispose(self.material.into());
    }
}

/// Secondary animated object with its own lifecycle (e.g. a smoke puff)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prop {
    pub slot: ResourceSlot,
    pub transform: Transform,
    /// Where the prop is emitted and returns to when it wraps around
    pub origin: Vec3,
}

impl Prop {
    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn reset_to_origin(&mut self) {
        self.transform.translation = self.origin;
    }
}

/// Every engine resource a running scene owns
///
/// The primary slot is the scene's main renderable (the galaxy points);
/// fixtures are static scenery; props are animated secondary objects.
#[derive(Debug, Default)]
pub struct ResourceSet {
    primary: Option<ResourceSlot>,
    fixtures: Vec<ResourceSlot>,
    props: Vec<Prop>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<&ResourceSlot> {
        self.primary.as_ref()
    }

    pub fn fixtures(&self) -> &[ResourceSlot] {
        &self.fixtures
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut [Prop] {
        &mut self.props
    }

    /// Store `slot` as the primary slot, handing back the one it replaces
    pub fn replace_primary(&mut self, slot: ResourceSlot) -> Option<ResourceSlot> {
        self.primary.replace(slot)
    }

    pub fn push_fixture(&mut self, slot: ResourceSlot) {
        self.fixtures.push(slot);
    }

    pub fn push_prop(&mut self, prop: Prop) -> usize {
        self.props.push(prop);
        self.props.len() - 1
    }

    pub fn slot_count(&self) -> usize {
        usize::from(self.primary.is_some()) + self.fixtures.len() + self.props.len()
    }

    /// Engine resources currently owned
    pub fn resource_count(&self) -> usize {
        self.slot_count() * ResourceSlot::RESOURCE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        self.slot_count() == 0
    }

    /// Release everything; slots leave the set as they are released, so a
    /// second call finds nothing to release. Returns the number of slots.
    pub fn release_all(&mut self, engine: &mut dyn RenderEngine) -> usize {
        let slots: Vec<ResourceSlot> = self
            .primary
            .take()
            .into_iter()
            .chain(self.fixtures.drain(..))
            .chain(self.props.drain(..).map(|prop| prop.slot))
            .collect();

        for slot in &slots {
            slot.release(engine);
        }
        slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::headless::HeadlessEngine;
    use crate::geometry::box_geometry;
    use crate::material::StandardMaterial;
    use crate::math::Color;

    fn slot(engine: &mut HeadlessEngine) -> ResourceSlot {
        ResourceSlot::create(
            engine,
            box_geometry(1.0, 1.0, 1.0),
            StandardMaterial::new(Color::WHITE).into(),
        )
    }

    #[test]
    fn test_counts_cover_every_kind() {
        let mut engine = HeadlessEngine::new();
        let mut set = ResourceSet::new();
        assert!(set.is_empty());

        let primary = slot(&mut engine);
        set.replace_primary(primary);
        set.push_fixture(slot(&mut engine));
        let prop_slot = slot(&mut engine);
        set.push_prop(Prop {
            slot: prop_slot,
            transform: Transform::IDENTITY,
            origin: Vec3::ZERO,
        });

        assert_eq!(set.slot_count(), 3);
        assert_eq!(set.resource_count(), 9);
        assert_eq!(engine.live_resource_count(), 9);
    }

    #[test]
    fn test_release_all_is_exactly_once() {
        let mut engine = HeadlessEngine::new();
        let mut set = ResourceSet::new();
        let primary = slot(&mut engine);
        set.replace_primary(primary);
        set.push_fixture(slot(&mut engine));

        assert_eq!(set.release_all(&mut engine), 2);
        assert_eq!(set.release_all(&mut engine), 0);

        assert!(set.is_empty());
        assert_eq!(engine.live_resource_count(), 0);
        assert_eq!(engine.invalid_releases(), 0);
    }

    #[test]
    fn test_prop_reset_to_origin() {
        let mut engine = HeadlessEngine::new();
        let mut prop = Prop {
            slot: slot(&mut engine),
            transform: Transform::from_translation(Vec3::new(1.0, 6.0, -2.0)),
            origin: Vec3::new(0.0, 3.5, 0.0),
        };
        prop.reset_to_origin();
        assert_eq!(prop.position(), Vec3::new(0.0, 3.5, 0.0));
    }
}
