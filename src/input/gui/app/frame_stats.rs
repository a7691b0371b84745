use std::time::{Duration, Instant};

const SAMPLE_WINDOW: Duration = Duration::from_millis(500);

/// Frames per second averaged over half-second windows.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window_start: Instant,
    frames: u32,
    fps: f64,
}

impl FrameStats {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    pub fn record_frame(&mut self, now: Instant) {
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= SAMPLE_WINDOW {
            self.fps = f64::from(self.frames) / elapsed.as_secs_f64();
            self.frames = 0;
            self.window_start = now;
        }
    }

    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_is_zero_until_first_window_closes() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);

        stats.record_frame(start + Duration::from_millis(100));

        assert_eq!(stats.fps(), 0.0);
    }

    #[test]
    fn test_fps_averages_over_window() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);

        for frame in 1..=30 {
            stats.record_frame(start + Duration::from_millis(frame * 500 / 30));
        }

        assert!((stats.fps() - 60.0).abs() < 1e-9);
    }
}
