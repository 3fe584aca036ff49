//! Wall-clock bookkeeping for the frame driver.
//!
//! [`FrameClock`] turns the timestamps the host scheduler hands us into
//! per-frame delta time, a frame counter, an FPS estimate, and a looping
//! progress value.
//!
//! All methods take an explicit `now`, so callers can drive the clock from
//! the host's frame timestamp (or from a test) instead of sampling
//! `Instant::now()` mid-frame.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Instant;
//! use vecflow::time::FrameClock;
//!
//! let mut clock = FrameClock::new(Instant::now());
//!
//! // In the host's frame callback:
//! let dt = clock.update(Instant::now());
//! println!("Delta: {:.4}s, FPS: {:.1}", dt, clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Frame timing state for one driver run.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// When the run started.
    start: Instant,
    /// Timestamp of the previous update.
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
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
}

impl FrameClock {
    /// Create a clock whose first frame is measured from `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Advance to `now`, returning the delta since the previous update in seconds.
    ///
    /// A timestamp earlier than the previous one yields a zero delta rather
    /// than running the simulation backwards.
    pub fn update(&mut self, now: Instant) -> f32 {
        self.delta_secs = now.saturating_duration_since(self.last_frame).as_secs_f32();
        if now > self.last_frame {
            self.last_frame = now;
        }
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            log::debug!("Flow frame rate: {:.1} fps", self.fps);
        }

        self.delta_secs
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
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

    /// Time between the start and the latest update.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.last_frame.saturating_duration_since(self.start)
    }

    /// Position in `[0, 1)` within a repeating cycle of length `period`.
    pub fn progress(&self, period: Duration) -> f32 {
        let period = period.as_secs_f64();
        if period <= 0.0 {
            return 0.0;
        }
        (self.elapsed().as_secs_f64() % period / period) as f32
    }

    /// Get the raw start instant.
    #[inline]
    pub fn start_instant(&self) -> Instant {
        self.start
    }
}
