//! Player entity
//!
//! Two mutually exclusive update modes: idle float before the run starts,
//! and full flight physics while playing. Velocities are per tick because
//! the simulation step is fixed; animation timers are in milliseconds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ROTATION, WING_FRAMES};
use crate::settings::BirdTuning;

/// The player's bird
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    pub pos: Vec2,
    /// Vertical velocity (pixels per tick, positive is down)
    pub velocity: f32,
    /// Radians, always within [-π/4, π/4]
    pub rotation: f32,
    /// Wing animation frame (0..3)
    pub wing_frame: u8,
    /// Time accumulated toward the next wing frame (ms)
    pub wing_timer_ms: f32,
    /// Idle bob phase (radians)
    pub bob_phase: f32,
    pub radius: f32,
}

impl Bird {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            velocity: 0.0,
            rotation: 0.0,
            wing_frame: 0,
            wing_timer_ms: 0.0,
            bob_phase: 0.0,
            radius,
        }
    }

    /// Pre-game float: sinusoidal bob, no gravity
    pub fn update_floating(&mut self, dt_ms: f32, tuning: &BirdTuning) {
        self.bob_phase += tuning.bob_speed * dt_ms;
        self.pos.y += self.bob_phase.sin() * tuning.bob_amplitude;
        self.advance_wings(dt_ms, tuning.idle_wing_interval_ms);
    }

    /// Active flight: gravity, integration, velocity-derived rotation
    pub fn update(&mut self, dt_ms: f32, tuning: &BirdTuning) {
        self.velocity += tuning.gravity;
        self.pos.y += self.velocity;
        self.rotation = clamp_rotation(self.velocity * tuning.rotation_factor);
        self.advance_wings(dt_ms, tuning.flight_wing_interval_ms);
    }

    /// Instantaneous velocity override, never additive
    pub fn flap(&mut self, impulse: f32) {
        self.velocity = impulse;
    }

    /// Reset for a new run (same instance, new start position)
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.velocity = 0.0;
        self.rotation = 0.0;
        self.wing_frame = 0;
        self.wing_timer_ms = 0.0;
        self.bob_phase = 0.0;
    }

    /// Whether position and velocity are usable numbers
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.velocity.is_finite()
    }

    /// Same timer rule as `Explosion::advance`: overshoot is dropped
    fn advance_wings(&mut self, dt_ms: f32, interval_ms: f32) {
        self.wing_timer_ms += dt_ms;
        if self.wing_timer_ms >= interval_ms {
            self.wing_frame = (self.wing_frame + 1) % WING_FRAMES;
            self.wing_timer_ms = 0.0;
        }
    }
}

/// Clamp a rotation to [-π/4, π/4]
#[inline]
pub fn clamp_rotation(angle: f32) -> f32 {
    angle.clamp(-MAX_ROTATION, MAX_ROTATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_STEP_MS;
    use proptest::prelude::*;

    const DT: f32 = SIM_STEP_MS as f32;

    fn bird() -> Bird {
        Bird::new(Vec2::new(96.0, 240.0), 15.0)
    }

    #[test]
    fn test_gravity_accumulates() {
        let tuning = BirdTuning::default();
        let mut b = bird();
        b.update(DT, &tuning);
        b.update(DT, &tuning);
        assert_eq!(b.velocity, 1.0);
        // 0.5 + 1.0
        assert_eq!(b.pos.y, 241.5);
    }

    #[test]
    fn test_flap_overrides_velocity() {
        let tuning = BirdTuning::default();
        let mut b = bird();
        b.velocity = 12.0;
        b.flap(tuning.flap_impulse);
        assert_eq!(b.velocity, -8.0);
        b.flap(tuning.flap_impulse);
        assert_eq!(b.velocity, -8.0);
    }

    #[test]
    fn test_wing_cycle_is_time_based() {
        let tuning = BirdTuning::default();
        let mut b = bird();
        // 100ms interval at ~16.67ms per tick
        for _ in 0..5 {
            b.update(DT, &tuning);
        }
        assert_eq!(b.wing_frame, 0);
        b.update(DT, &tuning);
        b.update(DT, &tuning);
        assert_eq!(b.wing_frame, 1);

        // Same wall time in bigger steps lands on the same frame count
        let mut coarse = bird();
        coarse.update(50.0, &tuning);
        coarse.update(50.0, &tuning);
        assert_eq!(coarse.wing_frame, 1);
    }

    #[test]
    fn test_wing_timer_restarts_on_frame_change() {
        let tuning = BirdTuning::default();
        let mut b = bird();
        b.update(130.0, &tuning);
        assert_eq!(b.wing_frame, 1);
        assert_eq!(b.wing_timer_ms, 0.0);
        // The 30 ms overshoot is not carried into the next frame
        b.update(90.0, &tuning);
        assert_eq!(b.wing_frame, 1);
    }

    #[test]
    fn test_idle_wings_are_slower() {
        let tuning = BirdTuning::default();
        let mut b = bird();
        for _ in 0..8 {
            b.update_floating(DT, &tuning);
        }
        assert_eq!(b.wing_frame, 0);
        for _ in 0..2 {
            b.update_floating(DT, &tuning);
        }
        assert_eq!(b.wing_frame, 1);
    }

    #[test]
    fn test_floating_has_no_gravity() {
        let tuning = BirdTuning::default();
        let mut b = bird();
        for _ in 0..600 {
            b.update_floating(DT, &tuning);
        }
        assert_eq!(b.velocity, 0.0);
        // Bob stays within a small band around the start
        assert!((b.pos.y - 240.0).abs() < 40.0);
    }

    #[test]
    fn test_reset_keeps_instance() {
        let tuning = BirdTuning::default();
        let mut b = bird();
        b.flap(tuning.flap_impulse);
        b.update(DT, &tuning);
        b.reset(Vec2::new(96.0, 240.0));
        assert_eq!(b.velocity, 0.0);
        assert_eq!(b.rotation, 0.0);
        assert_eq!(b.wing_frame, 0);
        assert_eq!(b.pos, Vec2::new(96.0, 240.0));
    }

    proptest! {
        #[test]
        fn rotation_always_clamped(flaps in proptest::collection::vec(any::<bool>(), 1..400)) {
            let tuning = BirdTuning::default();
            let mut b = bird();
            for flap in flaps {
                if flap {
                    b.flap(tuning.flap_impulse);
                }
                b.update(DT, &tuning);
                prop_assert!(b.rotation >= -MAX_ROTATION && b.rotation <= MAX_ROTATION);
            }
        }
    }
}
