//! Rolling frame-time statistics

/// Frames kept in the window
pub const FRAME_WINDOW: usize = 60;

/// Reported before any frame has been recorded
const IDLE_FPS: u32 = 60;

/// Ring buffer of recent frame durations (milliseconds)
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: [f64; FRAME_WINDOW],
    frame_index: usize,
    len: usize,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; FRAME_WINDOW],
            frame_index: 0,
            len: 0,
        }
    }

    /// Record one frame; non-finite or negative durations are dropped
    pub fn record(&mut self, frame_ms: f64) {
        if !frame_ms.is_finite() || frame_ms < 0.0 {
            return;
        }
        self.frame_times[self.frame_index] = frame_ms;
        self.frame_index = (self.frame_index + 1) % FRAME_WINDOW;
        self.len = (self.len + 1).min(FRAME_WINDOW);
    }

    fn samples(&self) -> &[f64] {
        // Until the ring wraps the filled part is a prefix
        &self.frame_times[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Average frame duration, rounded to 0.1 ms; 0 when empty
    pub fn average_frame_ms(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let avg = self.samples().iter().sum::<f64>() / self.len as f64;
        (avg * 10.0).round() / 10.0
    }

    pub fn fps(&self) -> u32 {
        if self.is_empty() {
            return IDLE_FPS;
        }
        let avg = self.samples().iter().sum::<f64>() / self.len as f64;
        fps_from_ms(avg)
    }

    /// FPS of the slowest frame in the window
    pub fn min_fps(&self) -> u32 {
        if self.is_empty() {
            return IDLE_FPS;
        }
        fps_from_ms(self.samples().iter().copied().fold(f64::MIN, f64::max))
    }

    /// FPS of the fastest frame in the window
    pub fn max_fps(&self) -> u32 {
        if self.is_empty() {
            return IDLE_FPS;
        }
        fps_from_ms(self.samples().iter().copied().fold(f64::MAX, f64::min))
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn fps_from_ms(ms: f64) -> u32 {
    if ms <= 0.0 {
        u32::MAX
    } else {
        (1000.0 / ms).round() as u32
    }
}
