//! Obstacles and their spawn countdown

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A pair of barriers with a scoring gap between them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    /// Vertical center of the gap
    pub gap_y: f32,
    pub gap_height: f32,
    pub width: f32,
    /// Set once the bird has passed this pipe
    pub scored: bool,
}

impl Pipe {
    pub fn new(x: f32, gap_y: f32, gap_height: f32, width: f32) -> Self {
        Self {
            x,
            gap_y,
            gap_height,
            width,
            scored: false,
        }
    }

    /// Spawn at the right edge with a gap center sampled inside the safe band
    pub fn spawn(
        rng: &mut impl Rng,
        viewport_width: f32,
        ground_line: f32,
        gap_height: f32,
        width: f32,
    ) -> Self {
        let (min, max) = gap_band(gap_height, ground_line);
        let gap_y = min + rng.random::<f32>() * (max - min);
        Self::new(viewport_width, gap_y, gap_height, width)
    }

    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
    }

    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.gap_y - self.gap_height / 2.0
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_y + self.gap_height / 2.0
    }

    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Fully past the left edge of the viewport
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }
}

/// Range of gap centers that keeps the whole gap between the top of the
/// playfield and the ground line
pub fn gap_band(gap_height: f32, ground_line: f32) -> (f32, f32) {
    let min = gap_height;
    let max = (ground_line - gap_height / 2.0).max(min);
    (min, max)
}

/// Countdown that releases one obstacle per interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipeSpawner {
    /// Time left until the next spawn (ms)
    pub remaining_ms: f32,
    pub interval_ms: f32,
}

impl PipeSpawner {
    /// A spawner that fires on its first tick
    pub fn new(interval_ms: f32) -> Self {
        Self {
            remaining_ms: 0.0,
            interval_ms,
        }
    }

    /// A spawner that waits a full interval before firing
    pub fn primed(interval_ms: f32) -> Self {
        Self {
            remaining_ms: interval_ms,
            interval_ms,
        }
    }

    /// Count down by `dt_ms`; returns true when a pipe should spawn
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        self.remaining_ms -= dt_ms;
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = self.interval_ms;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.remaining_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_STEP_MS;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_gap_inside_playfield() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..500 {
            let pipe = Pipe::spawn(&mut rng, 320.0, 380.0, 150.0, 52.0);
            assert_eq!(pipe.x, 320.0);
            assert!(pipe.gap_top() >= 0.0);
            assert!(pipe.gap_bottom() <= 380.0);
            assert!(!pipe.scored);
        }
    }

    #[test]
    fn test_offscreen_after_full_exit() {
        let mut pipe = Pipe::new(0.0, 200.0, 150.0, 52.0);
        pipe.advance(52.0);
        assert!(!pipe.is_offscreen());
        pipe.advance(0.5);
        assert!(pipe.is_offscreen());
    }

    #[test]
    fn test_spawner_waits_full_interval() {
        let step = SIM_STEP_MS as f32;
        let mut spawner = PipeSpawner::primed(1500.0);

        for _ in 0..10 {
            assert!(!spawner.tick(step));
        }
        assert!((spawner.remaining_ms - (1500.0 - 10.0 * step)).abs() < 0.01);

        let mut spawned = 0;
        for _ in 0..85 {
            if spawner.tick(step) {
                spawned += 1;
            }
        }
        // 95 ticks ≈ 1583ms: exactly one spawn
        assert_eq!(spawned, 1);
        assert!(spawner.remaining_ms <= 1500.0);
    }

    #[test]
    fn test_reset_spawner_fires_immediately() {
        let mut spawner = PipeSpawner::primed(1500.0);
        spawner.tick(100.0);
        spawner.reset();
        assert!(spawner.tick(SIM_STEP_MS as f32));
        assert_eq!(spawner.remaining_ms, 1500.0);
    }
}
