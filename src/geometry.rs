use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// CPU-side vertex buffers handed to a `RenderEngine`
///
/// `normals` is empty for point and line geometry. Without `indices` the
/// vertices are consumed in order (point list, line list or triangle list
/// depending on the material).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Option<Vec<[f32; 3]>>,
    pub indices: Option<Vec<u32>>,
}

impl GeometryData {
    pub fn points(positions: Vec<[f32; 3]>, colors: Vec<[f32; 3]>) -> Self {
        Self {
            positions,
            normals: Vec::new(),
            colors: Some(colors),
            indices: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Line-list indices covering every triangle edge once
    pub fn edge_indices(&self) -> Vec<u32> {
        let triangles: Vec<u32> = match &self.indices {
            Some(indices) => indices.clone(),
            None => (0..self.positions.len() as u32).collect(),
        };

        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for tri in triangles.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.extend_from_slice(&[a, b]);
                }
            }
        }
        edges
    }
}

/// Axis-aligned box centered on the origin, 4 vertices per face
pub fn box_geometry(width: f32, height: f32, depth: f32) -> GeometryData {
    let h = Vec3::new(width, height, depth) * 0.5;

    // (normal, u axis, v axis) per face; corners are n + (±u) + (±v)
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut geometry = GeometryData::default();
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces {
        let base = geometry.positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = (normal + u * su + v * sv) * h;
            geometry.positions.push(corner.to_array());
            geometry.normals.push(normal.to_array());
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    geometry.indices = Some(indices);
    geometry
}

/// Plane in the XY plane facing +Z
pub fn plane_geometry(width: f32, height: f32) -> GeometryData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    GeometryData {
        positions: vec![
            [-hw, -hh, 0.0],
            [hw, -hh, 0.0],
            [hw, hh, 0.0],
            [-hw, hh, 0.0],
        ],
        normals: vec![[0.0, 0.0, 1.0]; 4],
        colors: None,
        indices: Some(vec![0, 1, 2, 0, 2, 3]),
    }
}

/// UV sphere; pole rows produce a single triangle per segment
pub fn sphere_geometry(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);

    let mut geometry = GeometryData::default();
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            geometry.positions.push((normal * radius).to_array());
            geometry.normals.push(normal.to_array());
        }
    }

    let row = ws + 1;
    let mut indices = Vec::new();
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    geometry.indices = Some(indices);
    geometry
}

/// Capped cylinder along Y, centered on the origin
pub fn cylinder_geometry(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> GeometryData {
    let segments = radial_segments.max(3);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);

    let mut geometry = GeometryData::default();
    let mut indices = Vec::new();

    // Torso: top ring then bottom ring
    for (y, radius) in [(half, radius_top), (-half, radius_bottom)] {
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            geometry.positions.push([radius * sin, y, radius * cos]);
            geometry
                .normals
                .push(Vec3::new(sin, slope, cos).normalize().to_array());
        }
    }
    let row = segments + 1;
    for i in 0..segments {
        let (a, b) = (i, i + row);
        let (c, d) = (i + row + 1, i + 1);
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    for (y, radius, normal_y) in [(half, radius_top, 1.0f32), (-half, radius_bottom, -1.0)] {
        let center = geometry.positions.len() as u32;
        geometry.positions.push([0.0, y, 0.0]);
        geometry.normals.push([0.0, normal_y, 0.0]);
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            geometry.positions.push([radius * sin, y, radius * cos]);
            geometry.normals.push([0.0, normal_y, 0.0]);
        }
        for i in 0..segments {
            let (p, q) = (center + 1 + i, center + 2 + i);
            if normal_y > 0.0 {
                indices.extend_from_slice(&[center, p, q]);
            } else {
                indices.extend_from_slice(&[center, q, p]);
            }
        }
    }

    geometry.indices = Some(indices);
    geometry
}

/// Three colored line segments from the origin: X red, Y green, Z blue
pub fn axes_geometry(size: f32) -> GeometryData {
    let (red, green, blue) = ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
    GeometryData {
        positions: vec![
            [0.0, 0.0, 0.0],
            [size, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, size, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, 0.0, size],
        ],
        normals: Vec::new(),
        colors: Some(vec![red, red, green, green, blue, blue]),
        indices: None,
    }
}
