//! Flappy Sim - simulation core for a side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, terrain, collisions, per-phase updates)
//! - `game`: Orchestrator owning the game-flow state machine
//! - `game_loop`: Fixed-timestep driver
//! - `input`: Device-event queue and per-phase input gate
//! - `renderer`: Drawing surface contract and themes
//! - `platform`: Wall clock and external state channel
//! - `persistence`: Key-value storage for the high score and mute flag
//! - `audio`: Named sound cues and the mute flag
//! - `highscores`: Best score tracking
//! - `settings`: Tunable configuration loaded from JSON

pub mod audio;
pub mod error;
pub mod game;
pub mod game_loop;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{GameError, StoreError};
pub use game::{Game, GameServices};
pub use game_loop::{FrameOutcome, GameLoop, Simulation};
pub use highscores::HighScore;
pub use settings::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz), in milliseconds
    pub const SIM_STEP_MS: f64 = 1000.0 / 60.0;
    /// Maximum catch-up steps per displayed frame to prevent spiral of death
    pub const MAX_CATCH_UP_STEPS: u32 = 8;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: u32 = 320;
    pub const PLAYFIELD_HEIGHT: u32 = 480;
    pub const GROUND_HEIGHT: f32 = 100.0;
    /// Ground scroll per tick and stripe period
    pub const GROUND_SPEED: f32 = 2.0;
    pub const GROUND_STRIPE_PERIOD: f32 = 20.0;
    pub const GROUND_STRIPE_WIDTH: f32 = 10.0;

    /// Bird defaults (per-tick units: the step is fixed)
    pub const BIRD_RADIUS: f32 = 15.0;
    pub const BIRD_START_X_FRACTION: f32 = 0.3;
    pub const BIRD_START_Y_FRACTION: f32 = 0.5;
    pub const GRAVITY: f32 = 0.5;
    pub const FLAP_IMPULSE: f32 = -8.0;
    pub const ROTATION_FACTOR: f32 = 0.1;
    pub const MAX_ROTATION: f32 = std::f32::consts::FRAC_PI_4;
    pub const WING_FRAMES: u8 = 3;
    pub const FLIGHT_WING_INTERVAL_MS: f32 = 100.0;
    pub const IDLE_WING_INTERVAL_MS: f32 = 150.0;
    /// Bob phase advance per ms and vertical bob amplitude per tick
    pub const BOB_SPEED: f32 = 0.005;
    pub const BOB_AMPLITUDE: f32 = 0.5;

    /// Obstacle defaults
    pub const PIPE_GAP_HEIGHT: f32 = 150.0;
    pub const PIPE_SPEED: f32 = 2.0;
    pub const PIPE_SPAWN_INTERVAL_MS: f32 = 1500.0;

    /// Death sequence
    pub const DEATH_DURATION_MS: f64 = 2000.0;
    pub const EXPLOSION_FRAME_INTERVAL_MS: f32 = 200.0;

    /// Input
    pub const TOUCH_DEBOUNCE_MS: f64 = 300.0;

    /// Audio
    pub const MASTER_VOLUME: f32 = 0.8;

    /// Parallax background
    pub const CLOUD_COUNT: usize = 12;
    /// Terrain and clouds repeat over this many viewport widths
    pub const REPEAT_VIEWPORTS: f32 = 5.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep on [0, 1]
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
