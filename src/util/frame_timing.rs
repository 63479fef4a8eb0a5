use web_time::{Duration, Instant};

/// Longest step fed to animations; a stalled frame (window drag, debugger)
/// must not teleport a tween past its end in one jump.
const MAX_FRAME_DELTA: f32 = 0.1;

/// Frame timing with delta-time, FPS smoothing, and optional frame limiting.
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps,
            min_frame_duration,
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Returns true if enough time has passed since the last frame to render
    /// another one.
    #[must_use]
    pub fn should_render(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Call after rendering to update timing.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.record_frame_time(elapsed.as_secs_f32());
    }

    fn record_frame_time(&mut self, frame_time: f32) {
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

/// Clamp a frame delta in seconds to `[0, 0.1]`; non-finite deltas become 0.
#[must_use]
pub fn clamp_frame_delta(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DELTA)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_clamped() {
        assert_eq!(clamp_frame_delta(5.0), MAX_FRAME_DELTA);
        assert_eq!(clamp_frame_delta(-1.0), 0.0);
        assert_eq!(clamp_frame_delta(f32::NAN), 0.0);
        assert_eq!(clamp_frame_delta(0.016), 0.016);
    }

    #[test]
    fn fps_moves_toward_frame_rate() {
        let mut timing = FrameTiming::new(0);
        for _ in 0..200 {
            timing.record_frame_time(1.0 / 30.0);
        }
        assert!((timing.fps() - 30.0).abs() < 1.0);
    }

    #[test]
    fn unlimited_always_renders() {
        assert!(FrameTiming::new(0).should_render());
    }
}
