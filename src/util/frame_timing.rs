/// Frame timing with FPS smoothing and optional frame limiting.
///
/// Timestamps are seconds on the same clock the viewer hands to
/// [`SceneRenderEngine::render_frame`](crate::engine::SceneRenderEngine::render_frame).
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum seconds between frames based on target FPS
    min_frame_interval: f64,
    /// Timestamp of the last rendered frame
    last_frame: Option<f64>,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_interval = if target_fps > 0 {
            1.0 / f64::from(target_fps)
        } else {
            0.0
        };

        Self {
            target_fps,
            min_frame_interval,
            last_frame: None,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Whether enough time has passed since the last frame to render at `now`.
    #[must_use]
    pub fn should_render(&self, now: f64) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        match self.last_frame {
            Some(last) => now - last >= self.min_frame_interval,
            None => true,
        }
    }

    /// Record a rendered frame at `now`.
    pub fn end_frame(&mut self, now: f64) {
        if let Some(last) = self.last_frame {
            let frame_time = (now - last) as f32;
            if frame_time > 0.0 {
                let instant_fps = 1.0 / frame_time;
                self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                    + instant_fps * self.smoothing;
            }
        }
        self.last_frame = Some(now);
    }

    /// Current smoothed FPS.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_always_renders() {
        let mut timing = FrameTiming::new(0);
        timing.end_frame(1.0);
        assert!(timing.should_render(1.0));
    }

    #[test]
    fn limiter_waits_for_interval() {
        let mut timing = FrameTiming::new(10);
        assert!(timing.should_render(0.0));
        timing.end_frame(0.0);
        assert!(!timing.should_render(0.05));
        assert!(timing.should_render(0.1));
    }

    #[test]
    fn fps_moves_toward_frame_rate() {
        let mut timing = FrameTiming::new(0);
        let mut t = 0.0;
        for _ in 0..400 {
            timing.end_frame(t);
            t += 1.0 / 120.0;
        }
        assert!((timing.fps() - 120.0).abs() < 1.0, "fps {}", timing.fps());
    }

    #[test]
    fn repeated_timestamp_keeps_fps() {
        let mut timing = FrameTiming::new(0);
        timing.end_frame(2.0);
        timing.end_frame(2.0);
        assert_eq!(timing.fps(), 60.0);
    }
}
