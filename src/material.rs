use crate::math::Color;

/// How fragments combine with what is already in the color target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Blending {
    #[default]
    Normal,
    Additive,
}

/// Point sprites, one per vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsMaterial {
    /// World-space size when attenuated, pixels otherwise
    pub size: f32,
    pub size_attenuation: bool,
    pub depth_write: bool,
    pub blending: Blending,
    pub vertex_colors: bool,
    pub color: Color,
}

impl Default for PointsMaterial {
    fn default() -> Self {
        Self {
            size: 1.0,
            size_attenuation: true,
            depth_write: true,
            blending: Blending::Normal,
            vertex_colors: false,
            color: Color::WHITE,
        }
    }
}

/// Lit triangle mesh, optionally drawn as its edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    pub wireframe: bool,
}

impl StandardMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            wireframe: false,
        }
    }

    pub fn wireframe(color: Color) -> Self {
        Self {
            color,
            wireframe: true,
        }
    }
}

/// Unlit line list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMaterial {
    pub color: Color,
    pub vertex_colors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialConfig {
    Points(PointsMaterial),
    Standard(StandardMaterial),
    Line(LineMaterial),
}

impl MaterialConfig {
    pub fn base_color(&self) -> Color {
        match self {
            MaterialConfig::Points(m) => m.color,
            MaterialConfig::Standard(m) => m.color,
            MaterialConfig::Line(m) => m.color,
        }
    }

    pub fn uses_vertex_colors(&self) -> bool {
        match self {
            MaterialConfig::Points(m) => m.vertex_colors,
            MaterialConfig::Standard(_) => false,
            MaterialConfig::Line(m) => m.vertex_colors,
        }
    }
}

impl From<PointsMaterial> for MaterialConfig {
    fn from(material: PointsMaterial) -> Self {
        MaterialConfig::Points(material)
    }
}

impl From<StandardMaterial> for MaterialConfig {
    fn from(material: StandardMaterial) -> Self {
        MaterialConfig::Standard(material)
    }
}

impl From<LineMaterial> for MaterialConfig {
    fn from(material: LineMaterial) -> Self {
        MaterialConfig::Line(material)
    }
}
