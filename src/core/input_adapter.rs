use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pixel scroll deltas (touchpads) per wheel line
const PIXELS_PER_LINE: f32 = 100.0;

/// Adapter that turns Winit pointer events into orbit input
///
/// Drags are accumulated only while the left button is held; both drag and
/// scroll accumulate until the controls consume them on their next update.
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    /// Left button held
    rotating: bool,
    /// Last cursor position (physical pixels)
    cursor: Option<Vec2>,
    drag: Vec2,
    /// Wheel lines, positive away from the user
    scroll: f32,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent; returns true if it was a pointer event
    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                match state {
                    ElementState::Pressed => self.press(),
                    ElementState::Released => self.release(),
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.rotating = false;
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                self.scroll(lines);
                true
            }
            _ => false,
        }
    }

    pub fn press(&mut self) {
        self.rotating = true;
    }

    pub fn release(&mut self) {
        self.rotating = false;
    }

    pub fn move_cursor(&mut self, position: Vec2) {
        if let (true, Some(previous)) = (self.rotating, self.cursor) {
            self.drag += position - previous;
        }
        self.cursor = Some(position);
    }

    pub fn scroll(&mut self, lines: f32) {
        self.scroll += lines;
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    /// Drag accumulated since the last call
    pub fn take_drag(&mut self) -> Vec2 {
        std::mem::take(&mut self.drag)
    }

    /// Scroll accumulated since the last call
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Winit events carry device ids that cannot be built in tests, so these
    // drive the adapter through its direct methods.

    #[test]
    fn test_new_input_is_idle() {
        let mut input = PointerInput::new();
        assert!(!input.is_rotating());
        assert_eq!(input.take_drag(), Vec2::ZERO);
        assert_eq!(input.take_scroll(), 0.0);
    }

    #[test]
    fn test_drag_only_while_pressed() {
        let mut input = PointerInput::new();
        input.move_cursor(Vec2::new(10.0, 10.0));
        input.move_cursor(Vec2::new(20.0, 10.0));
        assert_eq!(input.take_drag(), Vec2::ZERO);

        input.press();
        input.move_cursor(Vec2::new(25.0, 4.0));
        input.move_cursor(Vec2::new(30.0, 0.0));
        input.release();
        input.move_cursor(Vec2::new(90.0, 90.0));

        assert_eq!(input.take_drag(), Vec2::new(10.0, -10.0));
        assert_eq!(input.take_drag(), Vec2::ZERO);
    }

    #[test]
    fn test_scroll_accumulates_until_taken() {
        let mut input = PointerInput::new();
        input.scroll(1.0);
        input.scroll(2.0);
        assert_eq!(input.take_scroll(), 3.0);
        assert_eq!(input.take_scroll(), 0.0);
    }
}
