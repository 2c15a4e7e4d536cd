//! Fixed-timestep loop
//!
//! The host calls `frame(now_ms)` once per display refresh. Simulation
//! steps run in constant `SIM_STEP_MS` increments from an accumulator;
//! render runs exactly once per frame.

use crate::consts::{MAX_CATCH_UP_STEPS, SIM_STEP_MS};

/// Something the loop can drive
pub trait Simulation {
    fn update(&mut self, dt_ms: f32);
    fn render(&mut self);
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Simulation steps run
    pub steps: u32,
    /// Steps dropped because the catch-up cap was hit
    pub dropped_steps: u32,
    pub rendered: bool,
    /// Whether the host should schedule another frame
    pub keep_running: bool,
}

#[derive(Debug, Clone)]
pub struct GameLoop {
    last_time: Option<f64>,
    accumulator: f64,
    step_ms: f64,
    max_steps: Option<u32>,
    stopped: bool,
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLoop {
    pub fn new() -> Self {
        Self::with_cap(Some(MAX_CATCH_UP_STEPS))
    }

    /// Loop with a custom catch-up cap; `None` catches up without bound
    pub fn with_cap(max_steps: Option<u32>) -> Self {
        Self {
            last_time: None,
            accumulator: 0.0,
            step_ms: SIM_STEP_MS,
            max_steps,
            stopped: false,
        }
    }

    /// Run one display frame
    pub fn frame(&mut self, now_ms: f64, sim: &mut impl Simulation) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        if self.stopped {
            return outcome;
        }

        // First frame only establishes the time base
        let Some(last) = self.last_time.replace(now_ms) else {
            sim.render();
            outcome.rendered = true;
            outcome.keep_running = true;
            return outcome;
        };

        // Clocks going backwards add nothing
        self.accumulator += (now_ms - last).max(0.0);

        while self.accumulator >= self.step_ms {
            if let Some(cap) = self.max_steps.filter(|cap| outcome.steps >= *cap) {
                let backlog = (self.accumulator / self.step_ms).floor() as u32;
                // Sub-step remainder only
                self.accumulator %= self.step_ms;
                outcome.dropped_steps = backlog;
                log::warn!(
                    "Catch-up cap of {cap} steps hit, dropping {backlog} steps ({:.1} ms)",
                    backlog as f64 * self.step_ms
                );
                break;
            }
            sim.update(self.step_ms as f32);
            self.accumulator -= self.step_ms;
            outcome.steps += 1;
        }

        sim.render();
        outcome.rendered = true;
        outcome.keep_running = true;
        outcome
    }

    /// Stop; later frames do nothing and ask not to be rescheduled
    pub fn stop(&mut self) {
        if !self.stopped {
            log::info!("Game loop stopped");
        }
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Leftover time (ms) not yet simulated
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }
}
