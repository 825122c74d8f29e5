//! Frame timing for animations.
//!
//! [`Time`] is the single source of truth for time-related values inside an
//! engine. It never reads a clock itself: the engine pushes a timestamp from
//! its [`Clock`] once per frame, which keeps every derived value reproducible
//! when a [`ManualClock`] is injected.
//!
//! # Example
//!
//! ```
//! use backdrop::time::{Clock, ManualClock, Time};
//!
//! let clock = ManualClock::new();
//! let mut time = Time::new(clock.now());
//!
//! clock.advance(0.5);
//! time.update(clock.now());
//!
//! assert_eq!(time.elapsed(), 0.5);
//! assert_eq!(time.frame(), 1);
//! ```

use std::cell::Cell;
use std::rc::Rc;
use web_time::Instant;

/// A monotonic time source measured in seconds.
pub trait Clock {
    /// Current time in seconds. Only differences between readings matter.
    fn now(&self) -> f64;
}

/// Wall clock backed by `web_time::Instant`.
///
/// Uses `performance.now()` on wasm32 and `std::time::Instant` elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle and give
/// another to an engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    seconds: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Create a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock with an initial reading.
    pub fn starting_at(seconds: f64) -> Self {
        let clock = Self::new();
        clock.set(seconds);
        clock
    }

    /// Jump to an absolute reading.
    pub fn set(&self, seconds: f64) {
        self.seconds.set(seconds);
    }

    /// Move the reading forward.
    pub fn advance(&self, seconds: f64) {
        self.seconds.set(self.seconds.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.seconds.get()
    }
}

/// Time tracking for a single animation loop.
///
/// Provides elapsed time, delta time, frame counting and an FPS estimate.
#[derive(Debug, Clone)]
pub struct Time {
    /// Timestamp the tracker was created at.
    start: f64,
    /// Timestamp of the last update.
    last_frame: f64,
    /// Seconds since `start` as of the last update.
    elapsed_secs: f64,
    /// Seconds between the last two updates.
    delta_secs: f64,
    /// Total updates since creation.
    frame_count: u64,
    /// FPS estimate, refreshed every `fps_update_interval` seconds.
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: f64,
    fps_update_interval: f64,
}

impl Time {
    /// Start tracking at the given timestamp.
    pub fn new(now: f64) -> Self {
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: 0.5,
        }
    }

    /// Record a new frame at timestamp `now`. Call once per frame.
    ///
    /// Timestamps that go backwards are treated as a zero-length frame.
    ///
    /// Returns `(elapsed, delta)` for convenience.
    pub fn update(&mut self, now: f64) -> (f64, f64) {
        let now = now.max(self.last_frame);

        self.delta_secs = now - self.last_frame;
        self.last_frame = now;
        self.elapsed_secs = now - self.start;
        self.frame_count += 1;

        let fps_elapsed = now - self.fps_update_time;
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = (frames_since as f64 / fps_elapsed) as f32;
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Seconds elapsed since the tracker started.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_secs
    }

    /// Seconds between the last two frames.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta_secs
    }

    /// Number of frames recorded.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed twice a second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_new() {
        let time = Time::new(3.0);
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
        assert_eq!(time.delta(), 0.0);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new(1.0);
        let (elapsed, delta) = time.update(1.25);
        assert_eq!(elapsed, 0.25);
        assert_eq!(delta, 0.25);

        let (elapsed, delta) = time.update(1.5);
        assert_eq!(elapsed, 0.5);
        assert_eq!(delta, 0.25);
        assert_eq!(time.frame(), 2);
    }

    #[test]
    fn test_backwards_timestamp_is_zero_delta() {
        let mut time = Time::new(0.0);
        time.update(2.0);
        time.update(1.0);
        assert_eq!(time.delta(), 0.0);
        assert_eq!(time.elapsed(), 2.0);
    }

    #[test]
    fn test_fps_estimate() {
        let mut time = Time::new(0.0);
        for i in 1..=30 {
            time.update(i as f64 / 60.0);
        }
        assert!((time.fps() - 60.0).abs() < 0.5);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::starting_at(2.0);
        let other = clock.clone();
        clock.advance(0.5);
        assert_eq!(other.now(), 2.5);
        other.set(10.0);
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
