use crate::camera::Camera;
use crate::core::Scene;
use crate::frame::FrameInfo;

/// Scene construction and per-frame animation
pub trait SceneProvider {
    /// Get scene name for the panel and logs
    fn name(&self) -> &str {
        "Scene"
    }

    /// Initial camera placement
    fn camera(&self) -> Camera;

    /// Create and attach the scene's resources; runs once on mount
    fn build(&mut self, scene: &mut Scene<'_>);

    /// Per-frame procedural animation
    fn animate(&mut self, _scene: &mut Scene<'_>, _frame: &FrameInfo) {}

    /// Draw parameter widgets; returns true when a parameter changed
    fn parameter_ui(&mut self, _ui: &mut egui::Ui) -> bool {
        false
    }

    /// Replace resources after `parameter_ui` reported a change
    fn rebuild(&mut self, _scene: &mut Scene<'_>) {}
}
