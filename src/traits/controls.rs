use crate::camera::Camera;

/// Interactive camera controller, stepped once per frame
///
/// Implementations keep easing the camera for a while after input stops
/// (damping), so `update` must run every frame even without new input.
pub trait InteractionControls {
    fn update(&mut self, camera: &mut Camera);
}

/// Controls that never move the camera
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedControls;

impl InteractionControls for FixedControls {
    fn update(&mut self, _camera: &mut Camera) {}
}
