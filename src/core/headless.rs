//! GPU-free implementations of the loop's capabilities.
//!
//! `HeadlessEngine` keeps the same bookkeeping a real backend would (live
//! resources, attached set, transforms) and records every call, which makes
//! it the engine for `--headless` runs, tests and benchmarks.

use std::collections::HashMap;

use crate::camera::Camera;
use crate::geometry::GeometryData;
use crate::material::MaterialConfig;
use crate::math::Transform;
use crate::traits::{
    FrameScheduler, GeometryHandle, MaterialHandle, RenderEngine, RenderableHandle,
    ResourceHandle, Viewport,
};

/// One recorded engine call
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SetViewport(Viewport),
    CreateGeometry(GeometryHandle),
    CreateMaterial(MaterialHandle),
    CreateRenderable(RenderableHandle),
    SetTransform(RenderableHandle),
    Attach(RenderableHandle),
    Detach(RenderableHandle),
    Dispose(ResourceHandle),
    RenderFrame { attached: usize },
}

#[derive(Debug, Clone, Copy)]
struct HeadlessRenderable {
    geometry: GeometryHandle,
    material: MaterialHandle,
    transform: Transform,
}

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    next_id: u64,
    geometries: HashMap<GeometryHandle, usize>,
    materials: HashMap<MaterialHandle, MaterialConfig>,
    renderables: HashMap<RenderableHandle, HeadlessRenderable>,
    attached: Vec<RenderableHandle>,
    peak_attached: usize,
    viewport: Option<Viewport>,
    frames_rendered: u64,
    last_camera: Option<Camera>,
    invalid_releases: usize,
    fail_next_render: bool,
    events: Vec<EngineEvent>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn attached(&self) -> &[RenderableHandle] {
        &self.attached
    }

    pub fn is_attached(&self, renderable: RenderableHandle) -> bool {
        self.attached.contains(&renderable)
    }

    /// Largest attached set observed so far
    pub fn peak_attached(&self) -> usize {
        self.peak_attached
    }

    /// Geometries, materials and renderables not yet disposed
    pub fn live_resource_count(&self) -> usize {
        self.geometries.len() + self.materials.len() + self.renderables.len()
    }

    pub fn live_renderables(&self) -> usize {
        self.renderables.len()
    }

    /// Disposals of handles that were unknown or already released
    pub fn invalid_releases(&self) -> usize {
        self.invalid_releases
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn last_camera(&self) -> Option<&Camera> {
        self.last_camera.as_ref()
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn transform_of(&self, renderable: RenderableHandle) -> Option<Transform> {
        self.renderables.get(&renderable).map(|r| r.transform)
    }

    pub fn material_of(&self, renderable: RenderableHandle) -> Option<&MaterialConfig> {
        let record = self.renderables.get(&renderable)?;
        self.materials.get(&record.material)
    }

    /// Vertex count of the geometry bound to `renderable`
    pub fn vertex_count_of(&self, renderable: RenderableHandle) -> Option<usize> {
        let record = self.renderables.get(&renderable)?;
        self.geometries.get(&record.geometry).copied()
    }

    /// Make the next `render_frame` fail, as a lost device would
    pub fn fail_next_render(&mut self) {
        self.fail_next_render = true;
    }
}

impl RenderEngine for HeadlessEngine {
    fn set_viewport(&mut self, viewport: &Viewport) {
        self.viewport = Some(*viewport);
        self.events.push(EngineEvent::SetViewport(*viewport));
    }

    fn create_geometry(&mut self, data: GeometryData) -> GeometryHandle {
        let handle = GeometryHandle(self.allocate());
        self.geometries.insert(handle, data.vertex_count());
        self.events.push(EngineEvent::CreateGeometry(handle));
        handle
    }

    fn create_material(&mut self, config: MaterialConfig) -> MaterialHandle {
        let handle = MaterialHandle(self.allocate());
        self.materials.insert(handle, config);
        self.events.push(EngineEvent::CreateMaterial(handle));
        handle
    }

    fn create_renderable(
        &mut self,
        geometry: GeometryHandle,
        material: MaterialHandle,
    ) -> RenderableHandle {
        let handle = RenderableHandle(self.allocate());
        self.renderables.insert(
            handle,
            HeadlessRenderable {
                geometry,
                material,
                transform: Transform::IDENTITY,
            },
        );
        self.events.push(EngineEvent::CreateRenderable(handle));
        handle
    }

    fn set_transform(&mut self, renderable: RenderableHandle, transform: Transform) {
        if let Some(record) = self.renderables.get_mut(&renderable) {
            record.transform = transform;
        }
        self.events.push(EngineEvent::SetTransform(renderable));
    }

    fn attach(&mut self, renderable: RenderableHandle) {
        if !self.attached.contains(&renderable) {
            self.attached.push(renderable);
            self.peak_attached = self.peak_attached.max(self.attached.len());
        }
        self.events.push(EngineEvent::Attach(renderable));
    }

    fn detach(&mut self, renderable: RenderableHandle) {
        self.attached.retain(|&h| h != renderable);
        self.events.push(EngineEvent::Detach(renderable));
    }

    fn dispose(&mut self, resource: ResourceHandle) {
        let known = match resource {
            ResourceHandle::Geometry(h) => self.geometries.remove(&h).is_some(),
            ResourceHandle::Material(h) => self.materials.remove(&h).is_some(),
            ResourceHandle::Renderable(h) => {
                if self.attached.contains(&h) {
                    log::warn!("Disposing attached renderable {:?}", h);
                    self.attached.retain(|&a| a != h);
                }
                self.renderables.remove(&h).is_some()
            }
        };

        if !known {
            log::warn!("Release of unknown resource {:?}", resource);
            self.invalid_releases += 1;
        }
        self.events.push(EngineEvent::Dispose(resource));
    }

    fn render_frame(&mut self, camera: &Camera) -> anyhow::Result<()> {
        if std::mem::take(&mut self.fail_next_render) {
            anyhow::bail!("headless device lost");
        }
        self.frames_rendered += 1;
        self.last_camera = Some(*camera);
        self.events.push(EngineEvent::RenderFrame {
            attached: self.attached.len(),
        });
        Ok(())
    }
}

/// Scheduler for hosts that pump frames themselves
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: bool,
    requests: u64,
    cancels: u64,
}

impl ManualScheduler {
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn cancels(&self) -> u64 {
        self.cancels
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }

    fn cancel_frame(&mut self) {
        self.pending = false;
        self.cancels += 1;
    }

    fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::axes_geometry;
    use crate::material::LineMaterial;
    use crate::math::Color;

    #[test]
    fn test_double_dispose_is_counted() {
        let mut engine = HeadlessEngine::new();
        let geometry = engine.create_geometry(axes_geometry(1.0));

        engine.dispose(geometry.into());
        assert_eq!(engine.invalid_releases(), 0);

        engine.dispose(geometry.into());
        assert_eq!(engine.invalid_releases(), 1);
    }

    #[test]
    fn test_attach_twice_keeps_one_entry() {
        let mut engine = HeadlessEngine::new();
        let geometry = engine.create_geometry(axes_geometry(1.0));
        let material = engine.create_material(
            LineMaterial {
                color: Color::WHITE,
                vertex_colors: true,
            }
            .into(),
        );
        let renderable = engine.create_renderable(geometry, material);

        engine.attach(renderable);
        engine.attach(renderable);
        assert_eq!(engine.attached(), &[renderable]);
        assert_eq!(engine.vertex_count_of(renderable), Some(6));
    }

    #[test]
    fn test_manual_scheduler_coalesces_requests() {
        let mut scheduler = ManualScheduler::default();
        scheduler.request_frame();
        scheduler.request_frame();

        assert!(scheduler.take_pending());
        assert!(!scheduler.take_pending());
        assert_eq!(scheduler.requests(), 2);
    }

    #[test]
    fn test_failed_render_is_one_shot() {
        let mut engine = HeadlessEngine::new();
        engine.fail_next_render();

        assert!(engine.render_frame(&Camera::default()).is_err());
        assert!(engine.render_frame(&Camera::default()).is_ok());
        assert_eq!(engine.frames_rendered(), 1);
    }
}
