use std::time::Instant;

const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self {
            number,
            time,
            delta,
        }
    }
}

/// Hands out one `FrameInfo` per tick and keeps a rolling FPS estimate
#[derive(Debug)]
pub struct FrameClock {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
    fps: f32,
    fps_frames: u32,
    fps_timer: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
            fps: 0.0,
            fps_frames: 0,
            fps_timer: 0.0,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Advance to the next frame
    pub fn next_frame(&mut self) -> FrameInfo {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        let time = now.duration_since(self.start_time).as_secs_f32();
        self.last_frame_time = now;

        let info = FrameInfo::new(self.frame_number, time, delta);
        self.frame_number += 1;
        self.update_fps(delta);
        info
    }

    fn update_fps(&mut self, delta: f32) {
        self.fps_frames += 1;
        self.fps_timer += delta;

        if self.fps_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.fps_frames as f32 / self.fps_timer;
            log::debug!("FPS: {:.1}", self.fps);
            self.fps_frames = 0;
            self.fps_timer = 0.0;
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn frame_numbers_increase() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.next_frame().number, 0);
        assert_eq!(clock.next_frame().number, 1);
        assert_eq!(clock.frame_number(), 2);
    }

    #[test]
    fn clock_measures_delta() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let frame = clock.next_frame();

        assert!(frame.delta >= 0.009);
        assert!(frame.time >= frame.delta);
    }

    #[test]
    fn fps_starts_at_zero() {
        let mut clock = FrameClock::new();
        clock.next_frame();
        assert_eq!(clock.fps(), 0.0);
    }
}
