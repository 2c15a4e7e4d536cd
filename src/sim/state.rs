//! Game-flow phases and the simulation world
//!
//! `World` is the single owned, exclusively mutated bundle of session
//! state. The orchestrator holds the active `GamePhase` and is the only
//! thing that changes it.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::cloud::Cloud;
use super::pipe::{Pipe, PipeSpawner};
use super::terrain::{Hill, HillLayer};
use crate::renderer::Color;
use crate::settings::GameConfig;

/// Current phase of the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, bird floating
    Title,
    /// Waiting for the first input, bird floating
    Ready,
    /// Active run
    Playing,
    /// Death animation after a collision
    Dying,
    /// Run ended, waiting for restart
    GameOver,
}

impl GamePhase {
    pub const ALL: [GamePhase; 5] = [
        GamePhase::Title,
        GamePhase::Ready,
        GamePhase::Playing,
        GamePhase::Dying,
        GamePhase::GameOver,
    ];

    /// Normalized token name (lowercase, as published externally)
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Title => "title",
            GamePhase::Ready => "ready",
            GamePhase::Playing => "playing",
            GamePhase::Dying => "dying",
            GamePhase::GameOver => "gameover",
        }
    }

    /// Whether background layers keep scrolling in this phase
    pub fn scrolls_background(&self) -> bool {
        *self != GamePhase::GameOver
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown state token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game phase {0:?}")]
pub struct UnknownPhase(pub String);

impl FromStr for GamePhase {
    type Err = UnknownPhase;

    /// Accepts any case and an optional leading `#`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('#').to_lowercase();
        GamePhase::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| UnknownPhase(s.to_string()))
    }
}

/// Two-frame explosion animation timer
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Explosion {
    /// 0 or 1
    pub frame: u8,
    pub timer_ms: f32,
}

impl Explosion {
    /// Advance by `dt_ms`, toggling the frame every `interval_ms`
    pub fn advance(&mut self, dt_ms: f32, interval_ms: f32) {
        self.timer_ms += dt_ms;
        if self.timer_ms >= interval_ms {
            self.frame = (self.frame + 1) % 2;
            self.timer_ms = 0.0;
        }
    }
}

/// Captured when entering the dying phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathInfo {
    pub position: Vec2,
    /// Wall-clock time of death (ms)
    pub started_at_ms: f64,
}

/// All session state advanced by the simulation
#[derive(Debug, Clone)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub ground_line: f32,
    pub bird: Bird,
    /// Active pipes in spawn order
    pub pipes: Vec<Pipe>,
    pub spawner: PipeSpawner,
    pub obstacle_width: f32,
    pub clouds: Vec<Cloud>,
    pub back_hills: Hill,
    pub front_hills: Hill,
    /// Ground stripe scroll, in (-stripe period, 0]
    pub ground_offset: f32,
    pub score: u32,
    pub explosion: Explosion,
    pub death: Option<DeathInfo>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl World {
    /// Build a world for the configured playfield
    pub fn new(config: &GameConfig, obstacle_width: f32, hill_colors: [Color; 2], seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let width = config.width as f32;
        let height = config.height as f32;
        let ground_line = config.ground_line();
        let repeat_width = width * config.terrain.repeat_viewports;

        let clouds = (0..config.cloud_count)
            .map(|_| Cloud::new(&mut rng, repeat_width, height))
            .collect();
        let back_hills = Hill::generate(
            HillLayer::Back,
            &config.back_hills,
            &config.terrain,
            width,
            ground_line,
            hill_colors[0],
            &mut rng,
        );
        let front_hills = Hill::generate(
            HillLayer::Front,
            &config.front_hills,
            &config.terrain,
            width,
            ground_line,
            hill_colors[1],
            &mut rng,
        );

        Self {
            width,
            height,
            ground_line,
            bird: Bird::new(bird_start(config), config.bird.radius),
            pipes: Vec::new(),
            spawner: PipeSpawner::new(config.pipes.spawn_interval_ms),
            obstacle_width,
            clouds,
            back_hills,
            front_hills,
            ground_offset: 0.0,
            score: 0,
            explosion: Explosion::default(),
            death: None,
            time_ticks: 0,
            rng,
        }
    }

    /// Clear everything a restart resets; background layers keep scrolling
    pub fn reset_session(&mut self, config: &GameConfig) {
        self.bird.reset(bird_start(config));
        self.pipes.clear();
        self.score = 0;
        self.spawner.reset();
        self.ground_offset = 0.0;
        self.explosion = Explosion::default();
        self.death = None;
    }

    /// Span over which clouds and hills repeat
    pub fn repeat_width(&self) -> f32 {
        self.back_hills.repeat_width
    }
}

/// Bird start position for a playfield
pub fn bird_start(config: &GameConfig) -> Vec2 {
    Vec2::new(
        config.width as f32 * config.bird.start_x_fraction,
        config.height as f32 * config.bird.start_y_fraction,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(seed: u64) -> World {
        let colors = [Color::rgb(0x1A, 0x8C, 0x4A), Color::rgb(0x19, 0xB3, 0x5A)];
        World::new(&GameConfig::default(), 52.0, colors, seed)
    }

    #[test]
    fn test_phase_tokens_round_trip() {
        for phase in GamePhase::ALL {
            assert_eq!(phase.as_str().parse::<GamePhase>(), Ok(phase));
        }
        assert_eq!("#GameOver".parse::<GamePhase>(), Ok(GamePhase::GameOver));
        assert_eq!(" Playing ".parse::<GamePhase>(), Ok(GamePhase::Playing));
        assert!("paused".parse::<GamePhase>().is_err());
        assert!("".parse::<GamePhase>().is_err());
    }

    #[test]
    fn test_new_world_layout() {
        let w = world(1);
        assert!(w.bird.pos.abs_diff_eq(Vec2::new(96.0, 240.0), 1e-3));
        assert_eq!(w.ground_line, 380.0);
        assert_eq!(w.clouds.len(), 12);
        assert!(w.pipes.is_empty());
        assert_eq!(w.back_hills.layer, HillLayer::Back);
        assert_eq!(w.front_hills.layer, HillLayer::Front);
        assert!(w.back_hills.speed < w.front_hills.speed);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = world(77);
        let b = world(77);
        assert_eq!(a.back_hills.points, b.back_hills.points);
        assert_eq!(a.clouds[3].x, b.clouds[3].x);
    }

    #[test]
    fn test_explosion_toggles() {
        let mut e = Explosion::default();
        e.advance(150.0, 200.0);
        assert_eq!(e.frame, 0);
        e.advance(60.0, 200.0);
        assert_eq!(e.frame, 1);
        e.advance(200.0, 200.0);
        assert_eq!(e.frame, 0);
    }

    #[test]
    fn test_reset_session() {
        let mut w = world(2);
        let config = GameConfig::default();
        w.score = 9;
        w.pipes.push(Pipe::new(100.0, 200.0, 150.0, 52.0));
        w.ground_offset = -6.0;
        w.bird.pos.y = 10.0;
        w.death = Some(DeathInfo {
            position: Vec2::ZERO,
            started_at_ms: 5.0,
        });
        let hills_offset = {
            w.back_hills.update();
            w.back_hills.offset
        };
        w.reset_session(&config);
        assert_eq!(w.score, 0);
        assert!(w.pipes.is_empty());
        assert_eq!(w.ground_offset, 0.0);
        assert_eq!(w.spawner.remaining_ms, 0.0);
        assert!(w.death.is_none());
        assert_eq!(w.bird.pos, bird_start(&config));
        assert_eq!(w.back_hills.offset, hills_offset);
    }
}
