use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::material::Blending;
use crate::types::{CameraUniform, ObjectUniform, Vertex};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Two triangles spanning [-1, 1]², expanded per point instance
const QUAD_CORNERS: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// Point instances read position and color straight out of `Vertex`
const POINT_INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        shader_location: 1,
        offset: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        shader_location: 2,
        offset: 24,
        format: wgpu::VertexFormat::Float32x3,
    },
];

/// Every pipeline the engine draws with, plus the shared layouts
pub struct Pipelines {
    pub camera_layout: wgpu::BindGroupLayout,
    pub object_layout: wgpu::BindGroupLayout,
    pub mesh: wgpu::RenderPipeline,
    pub lines: wgpu::RenderPipeline,
    /// Keyed by blending and depth write
    points: HashMap<(Blending, bool), wgpu::RenderPipeline>,
    pub quad_vb: wgpu::Buffer,
}

impl Pipelines {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let camera_layout = uniform_layout::<CameraUniform>(
            device,
            "Camera Layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let object_layout = uniform_layout::<ObjectUniform>(
            device,
            "Object Layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
        });
        let points_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Points Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("points.wgsl").into()),
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Vertex::ATTRIBUTES,
        };

        let mesh = create_pipeline(
            device,
            &PipelineDesc {
                label: "Mesh Pipeline",
                layout: &layout,
                shader: &mesh_shader,
                buffers: &[vertex_layout.clone()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                color_format,
                blend: wgpu::BlendState::REPLACE,
                depth_write: true,
            },
        );
        let lines = create_pipeline(
            device,
            &PipelineDesc {
                label: "Line Pipeline",
                layout: &layout,
                shader: &mesh_shader,
                buffers: &[vertex_layout],
                topology: wgpu::PrimitiveTopology::LineList,
                color_format,
                blend: wgpu::BlendState::REPLACE,
                depth_write: true,
            },
        );

        let point_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    shader_location: 0,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x2,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &POINT_INSTANCE_ATTRIBUTES,
            },
        ];

        let mut points = HashMap::new();
        for blending in [Blending::Normal, Blending::Additive] {
            for depth_write in [true, false] {
                let pipeline = create_pipeline(
                    device,
                    &PipelineDesc {
                        label: "Points Pipeline",
                        layout: &layout,
                        shader: &points_shader,
                        buffers: &point_buffers,
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        color_format,
                        blend: blend_state(blending),
                        depth_write,
                    },
                );
                points.insert((blending, depth_write), pipeline);
            }
        }

        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Quad VB"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            camera_layout,
            object_layout,
            mesh,
            lines,
            points,
            quad_vb,
        }
    }

    pub fn points(&self, blending: Blending, depth_write: bool) -> Option<&wgpu::RenderPipeline> {
        self.points.get(&(blending, depth_write))
    }
}

fn blend_state(blending: Blending) -> wgpu::BlendState {
    match blending {
        Blending::Normal => wgpu::BlendState::ALPHA_BLENDING,
        Blending::Additive => wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        },
    }
}

fn uniform_layout<T>(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }],
    })
}

struct PipelineDesc<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    color_format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    depth_write: bool,
}

fn create_pipeline(device: &wgpu::Device, desc: &PipelineDesc<'_>) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: desc.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.color_format,
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}
