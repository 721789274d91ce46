use crate::geometry::GeometryData;

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// width, height (physical pixels), pixel ratio, unused
    pub viewport: [f32; 4],
}

/// Per-renderable uniform: model matrix and material parameters
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// point size, size attenuation (0/1), vertex colors (0/1), lit (0/1)
    pub params: [f32; 4],
}

/// Vertex layout shared by meshes, lines and point instances
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

    /// Interleave geometry buffers; missing normals are zero, missing colors white
    pub fn interleave(geometry: &GeometryData) -> Vec<Vertex> {
        geometry
            .positions
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex {
                position: *position,
                normal: geometry.normals.get(i).copied().unwrap_or([0.0; 3]),
                color: geometry
                    .colors
                    .as_ref()
                    .and_then(|colors| colors.get(i).copied())
                    .unwrap_or([1.0; 3]),
            })
            .collect()
    }
}
