/// Simulation tick length.
pub const PHYSICS_DT: f32 = 1.0 / 60.0;

/// Ticks allowed per frame before the accumulator drops time.
const MAX_STEPS_PER_FRAME: usize = 8;

/// Turns variable frame time into whole fixed ticks.
///
/// The remainder stays in the accumulator; `alpha()` reports how far into
/// the next tick the frame falls, for render interpolation.
#[derive(Clone, Debug)]
pub struct FixedStep {
    pub step: f32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    /// Add `frame_dt` and return how many ticks to run now.
    pub fn advance(&mut self, frame_dt: f32) -> usize {
        self.accumulator += frame_dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME && self.accumulator >= self.step {
            log::warn!(
                "frame spike: dropping {:.3}s of simulation time",
                self.accumulator
            );
            self.accumulator %= self.step;
        }
        steps
    }

    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(PHYSICS_DT)
    }
}
