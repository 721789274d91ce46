/// A drawing surface that exists and can be rendered into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTarget {
    /// Logical width
    pub width: u32,
    /// Logical height
    pub height: u32,
    /// Device pixel density hint (physical pixels per logical pixel)
    pub pixel_ratio: f64,
}

impl SurfaceTarget {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Pixel ratio capped at `max`; high-density displays beyond it render
    /// at `max` and get upscaled
    pub fn clamped_pixel_ratio(&self, max: f32) -> f32 {
        (self.pixel_ratio as f32).min(max).max(f32::EPSILON)
    }
}

/// Supplies the drawing surface once the host has one
pub trait SurfaceProvider {
    /// `None` until a non-empty surface exists
    fn surface(&self) -> Option<SurfaceTarget>;
}

impl SurfaceProvider for Option<SurfaceTarget> {
    fn surface(&self) -> Option<SurfaceTarget> {
        *self
    }
}
