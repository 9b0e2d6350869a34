//! Fixed timestep accumulator
//!
//! Frame times vary; the simulation wants identical `dt` every step so that
//! replays and chain timings stay reproducible.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Turns variable frame times into whole simulation steps
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add one frame's elapsed time and return how many steps to run now.
    ///
    /// Long frames are clamped, and at most `max_substeps` are returned; any
    /// backlog beyond that is dropped so a stall cannot snowball.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }

    /// Fraction of a step left in the accumulator (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}
