//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order
//! - No drawing or platform calls

pub mod bird;
pub mod cloud;
pub mod collision;
pub mod pipe;
pub mod state;
pub mod terrain;
pub mod tick;

pub use bird::Bird;
pub use cloud::{Cloud, CloudShape};
pub use collision::{bird_hits_ground, bird_hits_pipe, bird_passed_pipe};
pub use pipe::{Pipe, PipeSpawner};
pub use state::{DeathInfo, Explosion, GamePhase, World};
pub use terrain::{Hill, HillLayer, Smoothing, TerrainParams};
pub use tick::{PlayOutcome, update_background, update_dying, update_idle, update_playing};
