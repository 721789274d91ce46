//! wgpu implementation of `RenderEngine`.
//!
//! Every geometry becomes one interleaved vertex buffer (plus index and
//! wireframe edge buffers when indexed). Meshes and lines draw it as
//! vertices; point materials draw it as instances of a screen-aligned quad.
//! Each renderable owns a small uniform buffer with its model matrix and
//! material parameters.

mod overlay;
mod pipelines;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Camera;
use crate::geometry::GeometryData;
use crate::material::MaterialConfig;
use crate::math::{Color, Transform};
use crate::traits::{
    GeometryHandle, MaterialHandle, RenderEngine, RenderableHandle, ResourceHandle, Viewport,
};
use crate::types::{CameraUniform, ObjectUniform, Vertex};

use overlay::Overlay;
use pipelines::{Pipelines, DEPTH_FORMAT};

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    index_buffer: Option<(wgpu::Buffer, u32)>,
    edge_buffer: Option<(wgpu::Buffer, u32)>,
}

struct GpuRenderable {
    geometry: GeometryHandle,
    material: MaterialHandle,
    transform: Transform,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct WgpuEngine {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    pipelines: Pipelines,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    overlay: Overlay,
    viewport: Viewport,
    next_id: u64,
    geometries: HashMap<GeometryHandle, GpuGeometry>,
    materials: HashMap<MaterialHandle, MaterialConfig>,
    renderables: HashMap<RenderableHandle, GpuRenderable>,
    attached: Vec<RenderableHandle>,
}

impl WgpuEngine {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find appropriate adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("Failed to create device")?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size.width, size.height)?;
        surface.configure(&device, &surface_config);

        let depth_view = Self::create_depth_view(&device, surface_config.width, surface_config.height);
        let pipelines = Pipelines::new(&device, surface_config.format);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[Camera::default().to_uniform([1.0, 1.0], 1.0)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &pipelines.camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let overlay = Overlay::new(&device, surface_config.format);
        let viewport = Viewport {
            width: size.width.max(1),
            height: size.height.max(1),
            pixel_ratio: 1.0,
            clear_color: Color::BLACK,
        };

        log::info!(
            "wgpu engine ready: {:?} {}x{}",
            surface_config.format,
            surface_config.width,
            surface_config.height
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            depth_view,
            pipelines,
            camera_buffer,
            camera_bind_group,
            overlay,
            viewport,
            next_id: 0,
            geometries: HashMap::new(),
            materials: HashMap::new(),
            renderables: HashMap::new(),
            attached: Vec::new(),
        })
    }

    /// Hex colors are authored in display space, so a non-sRGB target shows
    /// them unchanged
    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> anyhow::Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = Self::create_depth_view(
            &self.device,
            self.surface_config.width,
            self.surface_config.height,
        );
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Draw `primitives` over the next rendered frame
    pub fn queue_overlay(
        &mut self,
        primitives: Vec<egui::ClippedPrimitive>,
        textures_delta: egui::TexturesDelta,
        pixels_per_point: f32,
    ) {
        self.overlay
            .queue(primitives, textures_delta, pixels_per_point);
    }

    fn object_uniform(material: Option<&MaterialConfig>, transform: &Transform) -> ObjectUniform {
        let (color, params) = match material {
            Some(MaterialConfig::Points(m)) => (
                m.color,
                [
                    m.size,
                    flag(m.size_attenuation),
                    flag(m.vertex_colors),
                    0.0,
                ],
            ),
            Some(MaterialConfig::Standard(m)) => (m.color, [0.0, 0.0, 0.0, flag(!m.wireframe)]),
            Some(MaterialConfig::Line(m)) => (m.color, [0.0, 0.0, flag(m.vertex_colors), 0.0]),
            None => (Color::WHITE, [0.0; 4]),
        };
        ObjectUniform {
            model: transform.matrix().to_cols_array_2d(),
            color: color.to_rgba(1.0),
            params,
        }
    }

    fn write_object_uniform(&self, renderable: &GpuRenderable) {
        let uniform = Self::object_uniform(
            self.materials.get(&renderable.material),
            &renderable.transform,
        );
        self.queue.write_buffer(
            &renderable.uniform_buffer,
            0,
            bytemuck::cast_slice(&[uniform]),
        );
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, renderable: &GpuRenderable) {
        let (Some(geometry), Some(material)) = (
            self.geometries.get(&renderable.geometry),
            self.materials.get(&renderable.material),
        ) else {
            return;
        };
        if geometry.vertex_count == 0 {
            return;
        }

        pass.set_bind_group(1, &renderable.bind_group, &[]);
        match material {
            MaterialConfig::Points(m) => {
                let Some(pipeline) = self.pipelines.points(m.blending, m.depth_write) else {
                    return;
                };
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, self.pipelines.quad_vb.slice(..));
                pass.set_vertex_buffer(1, geometry.vertex_buffer.slice(..));
                pass.draw(0..6, 0..geometry.vertex_count);
            }
            MaterialConfig::Standard(m) if m.wireframe => {
                pass.set_pipeline(&self.pipelines.lines);
                pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                match &geometry.edge_buffer {
                    Some((edges, count)) => {
                        pass.set_index_buffer(edges.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..*count, 0, 0..1);
                    }
                    None => pass.draw(0..geometry.vertex_count, 0..1),
                }
            }
            MaterialConfig::Standard(_) | MaterialConfig::Line(_) => {
                let pipeline = match material {
                    MaterialConfig::Line(_) => &self.pipelines.lines,
                    _ => &self.pipelines.mesh,
                };
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                match &geometry.index_buffer {
                    Some((indices, count)) => {
                        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..*count, 0, 0..1);
                    }
                    None => pass.draw(0..geometry.vertex_count, 0..1),
                }
            }
        }
    }

    fn is_points(&self, renderable: &GpuRenderable) -> bool {
        matches!(
            self.materials.get(&renderable.material),
            Some(MaterialConfig::Points(_))
        )
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl RenderEngine for WgpuEngine {
    fn set_viewport(&mut self, viewport: &Viewport) {
        self.viewport = *viewport;
        let (width, height) = viewport.physical_size();
        if (width, height) != (self.surface_config.width, self.surface_config.height) {
            self.surface_config.width = width;
            self.surface_config.height = height;
            self.reconfigure();
            log::debug!("Surface resized to {}x{}", width, height);
        }
    }

    fn create_geometry(&mut self, data: GeometryData) -> GeometryHandle {
        let handle = GeometryHandle(self.allocate());
        let vertices = Vertex::interleave(&data);

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = |label: &str, indices: &[u32]| {
            (!indices.is_empty()).then(|| {
                let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                (buffer, indices.len() as u32)
            })
        };

        let geometry = GpuGeometry {
            index_buffer: data
                .indices
                .as_deref()
                .and_then(|indices| index_buffer("Geometry Indices", indices)),
            edge_buffer: data
                .indices
                .is_some()
                .then(|| data.edge_indices())
                .and_then(|edges| index_buffer("Geometry Edges", &edges)),
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        };
        self.geometries.insert(handle, geometry);
        handle
    }

    fn create_material(&mut self, config: MaterialConfig) -> MaterialHandle {
        let handle = MaterialHandle(self.allocate());
        self.materials.insert(handle, config);
        handle
    }

    fn create_renderable(
        &mut self,
        geometry: GeometryHandle,
        material: MaterialHandle,
    ) -> RenderableHandle {
        let handle = RenderableHandle(self.allocate());
        if !self.geometries.contains_key(&geometry) || !self.materials.contains_key(&material) {
            log::warn!(
                "Renderable {:?} bound to unknown {:?} / {:?}",
                handle,
                geometry,
                material
            );
        }

        let transform = Transform::IDENTITY;
        let uniform = Self::object_uniform(self.materials.get(&material), &transform);
        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Uniform"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &self.pipelines.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        self.renderables.insert(
            handle,
            GpuRenderable {
                geometry,
                material,
                transform,
                uniform_buffer,
                bind_group,
            },
        );
        handle
    }

    fn set_transform(&mut self, renderable: RenderableHandle, transform: Transform) {
        if let Some(record) = self.renderables.get_mut(&renderable) {
            record.transform = transform;
        }
        if let Some(record) = self.renderables.get(&renderable) {
            self.write_object_uniform(record);
        }
    }

    fn attach(&mut self, renderable: RenderableHandle) {
        if !self.attached.contains(&renderable) {
            self.attached.push(renderable);
        }
    }

    fn detach(&mut self, renderable: RenderableHandle) {
        self.attached.retain(|&h| h != renderable);
    }

    fn dispose(&mut self, resource: ResourceHandle) {
        let known = match resource {
            ResourceHandle::Geometry(h) => self.geometries.remove(&h).is_some(),
            ResourceHandle::Material(h) => self.materials.remove(&h).is_some(),
            ResourceHandle::Renderable(h) => {
                self.attached.retain(|&a| a != h);
                self.renderables.remove(&h).is_some()
            }
        };
        if !known {
            log::warn!("Release of unknown resource {:?}", resource);
        }
    }

    fn render_frame(&mut self, camera: &Camera) -> anyhow::Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, frame skipped");
                return Ok(());
            }
            Err(e) => return Err(anyhow::anyhow!("Surface error: {e}")),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let size = [
            self.surface_config.width as f32,
            self.surface_config.height as f32,
        ];
        let camera_uniform: CameraUniform = camera.to_uniform(size, self.viewport.pixel_ratio);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let [r, g, b] = self.viewport.clear_color.to_array();
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            // Opaque geometry first so blended points test against it
            let attached: Vec<&GpuRenderable> = self
                .attached
                .iter()
                .filter_map(|handle| self.renderables.get(handle))
                .collect();
            for renderable in attached.iter().filter(|r| !self.is_points(r)) {
                self.draw(&mut pass, renderable);
            }
            for renderable in attached.iter().filter(|r| self.is_points(r)) {
                self.draw(&mut pass, renderable);
            }
        }

        let overlay_buffers = self.overlay.encode(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            [self.surface_config.width, self.surface_config.height],
        );

        self.queue
            .submit(overlay_buffers.into_iter().chain(std::iter::once(encoder.finish())));
        frame.present();
        Ok(())
    }
}
