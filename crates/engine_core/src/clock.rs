//! Fixed-timestep frame clock for the simulation loop.

use std::time::{Duration, Instant};

/// Tracks real time and hands out fixed physics steps.
///
/// The loop calls [`FrameClock::update`] once per frame and then drains
/// [`FrameClock::should_fixed_update`] so physics always advances in
/// uniform increments regardless of frame pacing.
#[derive(Debug)]
pub struct FrameClock {
    start_time: Instant,
    last_frame: Instant,
    elapsed: Duration,
    /// Fixed timestep for physics (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time not yet consumed by fixed updates.
    accumulator: Duration,
    fixed_step_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            elapsed: Duration::ZERO,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
            fixed_step_count: 0,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.accumulator += now - self.last_frame;
        self.last_frame = now;
        self.elapsed = now - self.start_time;
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            self.fixed_step_count += 1;
            true
        } else {
            false
        }
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Total elapsed time in seconds since the clock started.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of fixed steps consumed so far.
    pub fn fixed_step_count(&self) -> u64 {
        self.fixed_step_count
    }

    /// Set the fixed timestep rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
    }
}
