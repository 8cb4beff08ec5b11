//! Fixed-step timing
//!
//! Converts variable frame times into a whole number of simulation ticks.

use std::time::Duration;

/// Most ticks run for a single frame; time beyond that is dropped
const MAX_CATCH_UP_TICKS: u32 = 5;

/// Accumulates frame time and hands out fixed-size ticks
#[derive(Debug, Clone)]
pub struct FixedStep {
    /// Seconds per tick
    step: f32,
    /// Time not yet consumed by a tick
    accumulator: f32,
    /// Total simulated time in seconds
    elapsed: f32,
}

impl FixedStep {
    /// A timer ticking `rate` times per second
    pub fn new(rate: u32) -> Self {
        Self {
            step: 1.0 / rate.max(1) as f32,
            accumulator: 0.0,
            elapsed: 0.0,
        }
    }

    /// Seconds per tick
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add frame time and return how many ticks to run now
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.accumulator += delta.as_secs_f32();

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < MAX_CATCH_UP_TICKS {
            self.accumulator -= self.step;
            self.elapsed += self.step;
            ticks += 1;
        }

        if ticks == MAX_CATCH_UP_TICKS && self.accumulator >= self.step {
            log::debug!("Dropping {:.3}s of simulation time", self.accumulator);
            self.accumulator %= self.step;
        }
        ticks
    }

    /// Get total simulated time
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Reset the timer
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.elapsed = 0.0;
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(60)
    }
}
