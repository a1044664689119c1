//! Fixed timestep accumulator
//!
//! Turns variable wall-clock frame deltas into a whole number of
//! fixed-size simulation steps.

use crate::audio::Sampler;
use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, SIM_DT_MS};
use crate::sim::{SimState, TickStats, tick};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    step_ms: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT_MS, MAX_SUBSTEPS)
    }
}

impl FixedTimestep {
    pub fn new(step_ms: f32, max_substeps: u32) -> Self {
        Self {
            step_ms,
            max_substeps,
            accumulator: 0.0,
        }
    }

    pub fn step_ms(&self) -> f32 {
        self.step_ms
    }

    /// Time banked but not yet simulated
    pub fn pending_ms(&self) -> f32 {
        self.accumulator
    }

    /// Bank `elapsed_ms` and return how many steps to run now.
    ///
    /// The delta is clamped to `MAX_FRAME_MS` so a stalled tab does not come
    /// back to a burst of steps; time beyond `max_substeps` stays banked.
    pub fn advance(&mut self, elapsed_ms: f32) -> u32 {
        self.accumulator += elapsed_ms.clamp(0.0, MAX_FRAME_MS);

        let mut steps = 0;
        while self.accumulator >= self.step_ms && steps < self.max_substeps {
            self.accumulator -= self.step_ms;
            steps += 1;
        }
        steps
    }

    /// Advance and run the resulting ticks against `state`
    pub fn run(
        &mut self,
        elapsed_ms: f32,
        state: &mut SimState,
        sampler: &mut dyn Sampler,
    ) -> TickStats {
        let mut stats = TickStats::default();
        for _ in 0..self.advance(elapsed_ms) {
            stats += tick(state, sampler, self.step_ms);
        }
        stats
    }
}
