//! Smoothed FPS counter and throttle for periodic panel stats pushes.

use web_time::{Duration, Instant};

/// Smoothed frames-per-second counter plus a throttle for periodic
/// side-channel pushes (panel stats).
pub struct FrameTiming {
    last_frame: Instant,
    smoothed_fps: f32,
    /// Weight of the newest sample in the moving average.
    smoothing: f32,
    last_report: Instant,
    report_interval: Duration,
}

impl FrameTiming {
    /// Timer reporting at most once per `report_interval`.
    #[must_use]
    pub fn new(report_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            smoothed_fps: 60.0,
            smoothing: 0.05,
            last_report: now,
            report_interval,
        }
    }

    /// Record the end of a frame.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(dt);
    }

    fn record(&mut self, dt: f32) {
        if dt > 0.0 {
            self.smoothed_fps = self
                .smoothed_fps
                .mul_add(1.0 - self.smoothing, self.smoothing / dt);
        }
    }

    /// Current smoothed FPS.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Returns `true` at most once per report interval.
    pub fn report_due(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_report) >= self.report_interval {
            self.last_report = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_frames_converge() {
        let mut timing = FrameTiming::new(Duration::from_millis(250));
        for _ in 0..500 {
            timing.record(1.0 / 120.0);
        }
        assert!((timing.fps() - 120.0).abs() < 1.0);
    }

    #[test]
    fn zero_dt_is_ignored() {
        let mut timing = FrameTiming::new(Duration::from_millis(250));
        timing.record(0.0);
        assert_eq!(timing.fps(), 60.0);
    }

    #[test]
    fn report_is_throttled() {
        let mut timing = FrameTiming::new(Duration::from_millis(250));
        let start = timing.last_report;
        assert!(!timing.report_due(start + Duration::from_millis(100)));
        assert!(timing.report_due(start + Duration::from_millis(300)));
        assert!(!timing.report_due(start + Duration::from_millis(400)));
    }
}
