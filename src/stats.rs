//! Frame rate statistics.

use instant::Duration;

const WINDOW: Duration = Duration::from_secs(1);

/// Counts frames and reports the rate once per second.
#[derive(Debug, Default)]
pub struct FrameStats {
    frames: u32,
    elapsed: Duration,
    last_fps: Option<f32>,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame of length `dt`. Returns the frame rate whenever a
    /// one-second window closes.
    pub fn tick(&mut self, dt: Duration) -> Option<f32> {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed < WINDOW {
            return None;
        }
        let fps = self.frames as f32 / self.elapsed.as_secs_f32();
        log::debug!("{:.1} fps", fps);
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        self.last_fps = Some(fps);
        Some(fps)
    }

    pub fn last_fps(&self) -> Option<f32> {
        self.last_fps
    }
}
