use std::sync::Arc;

use winit::window::Window;

use crate::traits::{FrameScheduler, SurfaceProvider, SurfaceTarget};

/// Exposes a winit window as the loop's drawing surface
pub struct WinitSurface<'a>(pub &'a Window);

impl SurfaceProvider for WinitSurface<'_> {
    fn surface(&self) -> Option<SurfaceTarget> {
        let size = self.0.inner_size();
        if size.width == 0 || size.height == 0 {
            return None;
        }
        let scale = self.0.scale_factor();
        Some(surface_target(size.width, size.height, scale))
    }
}

/// Logical size from a physical size and scale factor
pub fn surface_target(physical_width: u32, physical_height: u32, scale: f64) -> SurfaceTarget {
    let logical = |v: u32| ((v as f64 / scale).round() as u32).max(1);
    SurfaceTarget::new(logical(physical_width), logical(physical_height), scale)
}

/// Schedules frames through winit redraw requests
///
/// winit coalesces redraw requests on its own; `pending` lets the host
/// ignore redraws the loop did not ask for (expose events, resizes).
pub struct WinitScheduler {
    window: Arc<Window>,
    pending: bool,
}

impl WinitScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            pending: false,
        }
    }
}

impl FrameScheduler for WinitScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.window.request_redraw();
    }

    fn cancel_frame(&mut self) {
        self.pending = false;
    }

    fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_target_divides_by_scale() {
        let target = surface_target(2000, 1200, 2.0);
        assert_eq!((target.width, target.height), (1000, 600));
        assert_eq!(target.pixel_ratio, 2.0);
    }

    #[test]
    fn test_surface_target_never_zero() {
        let target = surface_target(1, 1, 3.0);
        assert_eq!((target.width, target.height), (1, 1));
    }
}
