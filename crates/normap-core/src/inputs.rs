//! Per-frame data handed from the window loop to the renderer.

use std::time::{Duration, Instant};

/// Drawable size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, or `1.0` while the window is minimised.
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Timing and viewport state for the frame being drawn.
#[derive(Debug)]
pub struct FrameData {
    pub created_at: Instant,
    pub viewport: Viewport,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
}

impl FrameData {
    pub fn new(viewport: Viewport) -> FrameData {
        let now = Instant::now();
        Self {
            created_at: now,
            viewport,
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Start a new frame now. Returns the seconds since the previous one.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Start a new frame at `now`. A `now` earlier than the previous frame
    /// counts as zero elapsed time.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = self.last_frame.max(now);
        self.frame_count = self.frame_count.wrapping_add(1);
        self.delta.as_secs_f32()
    }

    /// Seconds between creation and the current frame.
    pub fn elapsed_secs(&self) -> f32 {
        self.last_frame
            .saturating_duration_since(self.created_at)
            .as_secs_f32()
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn get_dimensions(&self) -> (u32, u32) {
        (self.viewport.width, self.viewport.height)
    }
}
