use crate::camera::Camera;
use crate::geometry::GeometryData;
use crate::material::MaterialConfig;
use crate::math::{Color, Transform};

/// Engine-allocated id of an uploaded geometry buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(pub u64);

/// Engine-allocated id of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u64);

/// Engine-allocated id of a drawable geometry/material pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderableHandle(pub u64);

/// Any resource the engine can release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceHandle {
    Geometry(GeometryHandle),
    Material(MaterialHandle),
    Renderable(RenderableHandle),
}

impl From<GeometryHandle> for ResourceHandle {
    fn from(handle: GeometryHandle) -> Self {
        ResourceHandle::Geometry(handle)
    }
}

impl From<MaterialHandle> for ResourceHandle {
    fn from(handle: MaterialHandle) -> Self {
        ResourceHandle::Material(handle)
    }
}

impl From<RenderableHandle> for ResourceHandle {
    fn from(handle: RenderableHandle) -> Self {
        ResourceHandle::Renderable(handle)
    }
}

/// Output configuration: logical size, pixel density and clear color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    pub clear_color: Color,
}

impl Viewport {
    /// Drawing-buffer size in physical pixels
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// Rendering backend the render loop drives
///
/// Creation methods never fail: backends allocate lazily or log and draw
/// nothing. Only `render_frame` reports errors.
pub trait RenderEngine {
    /// Resize the drawing buffer and set its clear color
    fn set_viewport(&mut self, viewport: &Viewport);

    fn create_geometry(&mut self, data: GeometryData) -> GeometryHandle;

    fn create_material(&mut self, config: MaterialConfig) -> MaterialHandle;

    fn create_renderable(
        &mut self,
        geometry: GeometryHandle,
        material: MaterialHandle,
    ) -> RenderableHandle;

    fn set_transform(&mut self, renderable: RenderableHandle, transform: Transform);

    /// Add to the drawn set; attaching twice is a no-op
    fn attach(&mut self, renderable: RenderableHandle);

    /// Remove from the drawn set; detaching an unattached renderable is a no-op
    fn detach(&mut self, renderable: RenderableHandle);

    /// Release the backing storage of a resource
    fn dispose(&mut self, resource: ResourceHandle);

    /// Draw every attached renderable from `camera`
    fn render_frame(&mut self, camera: &Camera) -> anyhow::Result<()>;
}
