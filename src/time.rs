//! Frame timing for scene hosts.
//!
//! Scenes never read the wall clock. A host owns a [`Time`], calls
//! [`Time::update`] once per frame (or [`Time::advance`] when stepping
//! deterministically) and hands the resulting delta to `Scene::tick`.
//!
//! # Example
//!
//! ```ignore
//! use emberglow::time::Time;
//!
//! let mut time = Time::new();
//!
//! // In the redraw handler:
//! let dt = time.update();
//! scene.tick(dt, &mut canvas);
//! ```

use std::time::{Duration, Instant};

/// Time tracking for a running scene.
///
/// Provides elapsed time, delta time, frame counting and FPS, with pause,
/// time scaling and an optional fixed step.
#[derive(Debug)]
pub struct Time {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Total scaled time fed to the scene.
    elapsed: Duration,
    /// Scaled time of the last frame.
    delta: Duration,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    paused: bool,
    /// Fixed delta for deterministic updates, overrides wall-clock deltas.
    fixed_delta: Option<Duration>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
        }
    }

    /// Update timing from the wall clock. Call once per frame.
    ///
    /// Returns the delta to feed the scene: zero while paused, the fixed
    /// delta when one is set, otherwise the scaled wall-clock delta.
    pub fn update(&mut self) -> Duration {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame);
        self.last_frame = now;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.advance(raw)
    }

    /// Step time by `raw` without touching the wall clock.
    ///
    /// Used by the headless recorder and by tests.
    pub fn advance(&mut self, raw: Duration) -> Duration {
        self.frame_count += 1;

        if self.paused {
            self.delta = Duration::ZERO;
            return self.delta;
        }

        let step = self.fixed_delta.unwrap_or(raw);
        self.delta = if self.time_scale == 1.0 {
            step
        } else {
            step.mul_f64(f64::from(self.time_scale))
        };
        self.elapsed += self.delta;
        self.delta
    }

    /// Total scaled time since start.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Delta of the last frame.
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Toggle pause state.
    ///
    /// While paused, deltas are zero and elapsed time stops.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set a fixed delta for deterministic updates.
    ///
    /// Pass `None` to use real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<Duration>) {
        self.fixed_delta = delta;
    }

    /// Set time scale multiplier.
    ///
    /// - `1.0` = normal speed
    /// - `0.5` = half speed (slow motion)
    /// - `2.0` = double speed
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert!(!time.is_paused());
        assert_eq!(time.time_scale(), 1.0);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let delta = time.update();

        assert!(delta > Duration::ZERO);
        assert_eq!(time.elapsed(), delta);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_time_pause() {
        let mut time = Time::new();
        time.advance(Duration::from_millis(16));

        time.toggle_pause();
        assert!(time.is_paused());

        let elapsed_before = time.elapsed();
        let delta = time.advance(Duration::from_millis(16));

        assert_eq!(delta, Duration::ZERO);
        assert_eq!(time.elapsed(), elapsed_before);
    }

    #[test]
    fn test_time_scale() {
        let mut time = Time::new();
        time.set_time_scale(2.0);
        let delta = time.advance(Duration::from_millis(10));
        assert!(delta.abs_diff(Duration::from_millis(20)) < Duration::from_micros(1));

        // Negative scale should clamp to 0
        time.set_time_scale(-1.0);
        assert_eq!(time.time_scale(), 0.0);
    }

    #[test]
    fn test_fixed_delta() {
        let mut time = Time::new();
        time.set_fixed_delta(Some(Duration::from_micros(16_667)));

        thread::sleep(Duration::from_millis(30));
        let delta = time.update();

        // Should use fixed delta regardless of actual time
        assert_eq!(delta, Duration::from_micros(16_667));
    }
}
