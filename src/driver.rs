//! Per-frame driver for the simulation surface.
//!
//! The host scheduler calls [`FrameDriver::tick`] once per display frame.
//! While the driver is running, each tick measures the wall-clock delta since
//! the previous tick, advances the surface by that much, and binds the
//! surface's output texture to the display quad.
//!
//! ```text
//!  Idle --arm--> Running --stop--> Idle
//!                   |  ^
//!                   +--+ arm (previous run stopped first)
//! ```
//!
//! There is only ever one run. Arming while running replaces the run, so a
//! new dataset never ends up with two callbacks advancing the surface in the
//! same frame. A tick that arrives after [`FrameDriver::stop`] does nothing,
//! even if the host had already queued it.

use std::time::{Duration, Instant};

use crate::scene::Quad;
use crate::surface::SimulationSurface;
use crate::time::FrameClock;

/// Cycle length of the keep-alive progress value.
pub const LOOP_PERIOD: Duration = Duration::from_secs(100);

/// Whether the driver currently advances the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The driver is idle; nothing happened.
    Stopped,
    /// Running, but no render context yet. Only the timestamp moved.
    Pending { dt: f32 },
    /// The surface was advanced by `dt` seconds and its output rebound.
    Advanced { dt: f32 },
}

#[derive(Debug)]
struct Run {
    clock: FrameClock,
    generation: u64,
}

/// Frame driver state machine.
#[derive(Debug, Default)]
pub struct FrameDriver {
    run: Option<Run>,
    generation: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DriverState {
        if self.run.is_some() {
            DriverState::Running
        } else {
            DriverState::Idle
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Identifier of the current (or most recent) run.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new run at `now`, stopping any previous one first.
    ///
    /// Returns the new run's generation.
    pub fn arm(&mut self, now: Instant) -> u64 {
        self.stop();
        self.generation += 1;
        self.run = Some(Run {
            clock: FrameClock::new(now),
            generation: self.generation,
        });
        log::debug!("Frame driver armed (run {})", self.generation);
        self.generation
    }

    /// Stop the current run. Safe to call at any time, any number of times.
    pub fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            log::debug!(
                "Frame driver stopped (run {}, {} frames)",
                run.generation,
                run.clock.frame()
            );
        }
    }

    /// Keep-alive progress of the current run in `[0, 1)`.
    pub fn progress(&self) -> Option<f32> {
        self.run.as_ref().map(|run| run.clock.progress(LOOP_PERIOD))
    }

    /// Frames ticked in the current run.
    pub fn frames(&self) -> u64 {
        self.run.as_ref().map_or(0, |run| run.clock.frame())
    }

    /// Handle one display frame.
    ///
    /// Without a `context` only the timestamp bookkeeping runs; the surface
    /// is not touched and no catch-up happens once a context arrives.
    pub fn tick<S: SimulationSurface>(
        &mut self,
        now: Instant,
        context: Option<&S::Context>,
        surface: &mut S,
        quad: &mut Quad<S::Texture>,
    ) -> TickOutcome {
        let Some(run) = self.run.as_mut() else {
            return TickOutcome::Stopped;
        };
        let dt = run.clock.update(now);

        match context {
            Some(context) => {
                let output = surface.update(context, dt);
                quad.material.diffuse_map = Some(output);
                TickOutcome::Advanced { dt }
            }
            None => TickOutcome::Pending { dt },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::{FieldTexture, GradientTexture};

    #[derive(Default)]
    struct CountingSurface {
        field: FieldTexture,
        updates: Vec<f32>,
    }

    impl SimulationSurface for CountingSurface {
        type Context = ();
        type Texture = usize;

        fn vector_field_texture(&mut self) -> &mut FieldTexture {
            &mut self.field
        }
        fn set_particle_density(&mut self, _x: u32, _y: u32) {}
        fn resize(&mut self, _width: u32, _height: u32) {}
        fn update(&mut self, _context: &(), dt: f32) -> usize {
            self.updates.push(dt);
            self.updates.len()
        }
        fn set_gradient_texture(&mut self, _gradient: Option<&GradientTexture>) {}
        fn dispose(&mut self, _context: &()) {}
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut driver = FrameDriver::new();
        let mut surface = CountingSurface::default();
        let mut quad = Quad::new();
        assert_eq!(driver.state(), DriverState::Idle);
        let outcome = driver.tick(Instant::now(), Some(&()), &mut surface, &mut quad);
        assert_eq!(outcome, TickOutcome::Stopped);
        assert!(surface.updates.is_empty());
    }

    #[test]
    fn test_running_tick_advances_by_wall_clock() {
        let t0 = Instant::now();
        let mut driver = FrameDriver::new();
        let mut surface = CountingSurface::default();
        let mut quad = Quad::new();

        driver.arm(t0);
        let outcome = driver.tick(t0 + ms(16), Some(&()), &mut surface, &mut quad);
        match outcome {
            TickOutcome::Advanced { dt } => assert!((dt - 0.016).abs() < 1e-6),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(quad.material.diffuse_map, Some(1));
        driver.tick(t0 + ms(50), Some(&()), &mut surface, &mut quad);
        assert!((surface.updates[1] - 0.034).abs() < 1e-6);
        assert_eq!(quad.material.diffuse_map, Some(2));
        assert_eq!(driver.frames(), 2);
    }

    #[test]
    fn test_tick_without_context_only_keeps_time() {
        let t0 = Instant::now();
        let mut driver = FrameDriver::new();
        let mut surface = CountingSurface::default();
        let mut quad = Quad::new();

        driver.arm(t0);
        let outcome = driver.tick(t0 + ms(500), None, &mut surface, &mut quad);
        assert!(matches!(outcome, TickOutcome::Pending { .. }));
        assert!(surface.updates.is_empty());
        assert!(quad.material.diffuse_map.is_none());

        // No catch-up for the skipped frame.
        driver.tick(t0 + ms(516), Some(&()), &mut surface, &mut quad);
        assert!((surface.updates[0] - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_stop_blocks_queued_ticks() {
        let t0 = Instant::now();
        let mut driver = FrameDriver::new();
        let mut surface = CountingSurface::default();
        let mut quad = Quad::new();

        driver.arm(t0);
        driver.stop();
        driver.stop();
        let outcome = driver.tick(t0 + ms(16), Some(&()), &mut surface, &mut quad);
        assert_eq!(outcome, TickOutcome::Stopped);
        assert!(surface.updates.is_empty());
        assert_eq!(driver.progress(), None);
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let mut driver = FrameDriver::new();
        driver.stop();
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(driver.generation(), 0);
    }

    #[test]
    fn test_rearm_keeps_single_run() {
        let t0 = Instant::now();
        let mut driver = FrameDriver::new();
        let mut surface = CountingSurface::default();
        let mut quad = Quad::new();

        assert_eq!(driver.arm(t0), 1);
        assert_eq!(driver.arm(t0 + ms(5)), 2);
        driver.tick(t0 + ms(21), Some(&()), &mut surface, &mut quad);
        assert_eq!(surface.updates.len(), 1);
        // Delta is measured from the latest arm.
        assert!((surface.updates[0] - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_progress_cycles() {
        let t0 = Instant::now();
        let mut driver = FrameDriver::new();
        let mut surface = CountingSurface::default();
        let mut quad = Quad::new();
        driver.arm(t0);
        driver.tick(t0 + Duration::from_secs(150), None, &mut surface, &mut quad);
        let progress = driver.progress().unwrap();
        assert!((progress - 0.5).abs() < 1e-6);
    }
}
