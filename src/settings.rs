//! Game configuration
//!
//! Every tunable lives here with a serde default, so a partial JSON file
//! only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;
use crate::sim::terrain::{Smoothing, TerrainParams};

/// Player physics tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdTuning {
    pub radius: f32,
    /// Start position as a fraction of the playfield size
    pub start_x_fraction: f32,
    pub start_y_fraction: f32,
    /// Velocity added every tick while flying
    pub gravity: f32,
    /// Velocity set (not added) by a flap
    pub flap_impulse: f32,
    /// Rotation per unit of velocity before clamping
    pub rotation_factor: f32,
    pub flight_wing_interval_ms: f32,
    pub idle_wing_interval_ms: f32,
    pub bob_speed: f32,
    pub bob_amplitude: f32,
}

impl Default for BirdTuning {
    fn default() -> Self {
        Self {
            radius: BIRD_RADIUS,
            start_x_fraction: BIRD_START_X_FRACTION,
            start_y_fraction: BIRD_START_Y_FRACTION,
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            rotation_factor: ROTATION_FACTOR,
            flight_wing_interval_ms: FLIGHT_WING_INTERVAL_MS,
            idle_wing_interval_ms: IDLE_WING_INTERVAL_MS,
            bob_speed: BOB_SPEED,
            bob_amplitude: BOB_AMPLITUDE,
        }
    }
}

/// Obstacle tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeTuning {
    pub gap_height: f32,
    /// Leftward movement per tick
    pub speed: f32,
    pub spawn_interval_ms: f32,
}

impl Default for PipeTuning {
    fn default() -> Self {
        Self {
            gap_height: PIPE_GAP_HEIGHT,
            speed: PIPE_SPEED,
            spawn_interval_ms: PIPE_SPAWN_INTERVAL_MS,
        }
    }
}

/// One parallax hill layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HillLayerConfig {
    /// Leftward scroll per tick
    pub speed: f32,
    pub smoothing: Smoothing,
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    pub ground_height: f32,
    pub ground_speed: f32,
    pub bird: BirdTuning,
    pub pipes: PipeTuning,
    pub death_duration_ms: f64,
    pub explosion_frame_interval_ms: f32,
    pub touch_debounce_ms: f64,
    /// Cue volume, 0.0 - 1.0
    pub master_volume: f32,
    pub cloud_count: usize,
    pub back_hills: HillLayerConfig,
    pub front_hills: HillLayerConfig,
    pub terrain: TerrainParams,
    /// Catch-up cap for the fixed-timestep loop (`None` = unbounded)
    pub max_catch_up_steps: Option<u32>,
    /// RNG seed (`None` = derive from the wall clock)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            ground_height: GROUND_HEIGHT,
            ground_speed: GROUND_SPEED,
            bird: BirdTuning::default(),
            pipes: PipeTuning::default(),
            death_duration_ms: DEATH_DURATION_MS,
            explosion_frame_interval_ms: EXPLOSION_FRAME_INTERVAL_MS,
            touch_debounce_ms: TOUCH_DEBOUNCE_MS,
            master_volume: MASTER_VOLUME,
            cloud_count: CLOUD_COUNT,
            back_hills: HillLayerConfig {
                speed: 0.5,
                smoothing: Smoothing::Bezier,
            },
            front_hills: HillLayerConfig {
                speed: 0.7,
                smoothing: Smoothing::CatmullRom,
            },
            terrain: TerrainParams::default(),
            max_catch_up_steps: Some(MAX_CATCH_UP_STEPS),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Y coordinate of the top of the ground strip
    pub fn ground_line(&self) -> f32 {
        self.height as f32 - self.ground_height
    }

    /// Parse a (possibly partial) JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path).map_err(GameError::ConfigIo)?;
        Self::from_json_str(&json)
    }

    /// Load configuration, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default config ({})", e);
                Self::default()
            }
        }
    }
}
