//! Game orchestrator
//!
//! Owns the game-flow state machine, the world, the input gate and the
//! collaborators. Phase changes only ever go through `change_state`, which
//! applies the entry side effects and publishes the new phase.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::audio::{AudioService, NullBackend, cues};
use crate::error::GameError;
use crate::game_loop::Simulation;
use crate::highscores::HighScore;
use crate::input::{Action, DeviceEvent, InputGate, InputSender};
use crate::persistence::{self, KeyValueStore, MUTED_KEY, MemoryStore};
use crate::platform::{Clock, NullChannel, StateChannel, SystemClock};
use crate::renderer::{Canvas, Scene, Theme, draw_scene};
use crate::settings::GameConfig;
use crate::sim::collision::CollisionKind;
use crate::sim::{self, DeathInfo, GamePhase, World};

/// Collaborators injected at composition time
pub struct GameServices {
    pub theme: Box<dyn Theme>,
    pub audio: AudioService,
    pub store: Box<dyn KeyValueStore>,
    pub channel: Box<dyn StateChannel>,
    pub clock: Box<dyn Clock>,
}

impl GameServices {
    /// Silent audio, volatile storage, no published state and the system
    /// clock
    pub fn headless(theme: Box<dyn Theme>) -> Self {
        let audio = AudioService::for_theme(Box::new(NullBackend), theme.has_death_animation());
        Self {
            theme,
            audio,
            store: Box::new(MemoryStore::new()),
            channel: Box::new(NullChannel),
            clock: Box::new(SystemClock::new()),
        }
    }
}

/// The orchestrator
pub struct Game<C: Canvas> {
    canvas: C,
    config: GameConfig,
    theme: Box<dyn Theme>,
    audio: AudioService,
    store: Box<dyn KeyValueStore>,
    channel: Box<dyn StateChannel>,
    clock: Box<dyn Clock>,
    input: InputGate,
    world: World,
    phase: GamePhase,
    high_score: HighScore,
}

impl<C: Canvas> Game<C> {
    /// Build a game drawing into `canvas`. Fails if the canvas cannot
    /// provide a 2D surface.
    pub fn new(mut canvas: C, mut config: GameConfig, services: GameServices) -> Result<Self, GameError> {
        if canvas.context_2d().is_none() {
            return Err(GameError::SurfaceUnavailable);
        }

        let (width, height) = canvas.size();
        if (width, height) != (config.width, config.height) {
            log::info!(
                "Playfield {}x{} follows the canvas (config said {}x{})",
                width,
                height,
                config.width,
                config.height
            );
            config.width = width;
            config.height = height;
        }

        let GameServices {
            theme,
            mut audio,
            store,
            channel,
            clock,
        } = services;

        let seed = config.seed.unwrap_or_else(wall_clock_seed);
        let world = World::new(
            &config,
            theme.obstacle_width(),
            theme.palette().hill_colors(),
            seed,
        );

        let high_score = HighScore::load(store.as_ref());
        audio.set_muted(persistence::load_bool(store.as_ref(), MUTED_KEY));
        audio.set_master_volume(config.master_volume);
        let missing = audio.missing_cues(&cues::ALL);
        if !missing.is_empty() {
            log::warn!("No sound for cues {missing:?}; they will play silently");
        }

        let mut input = InputGate::new(config.touch_debounce_ms);
        for phase in GamePhase::ALL {
            input.remove_handler(phase.as_str());
        }
        input.add_handler(GamePhase::Title.as_str(), Action::ShowReady);
        input.add_handler(GamePhase::Ready.as_str(), Action::StartRun);
        input.add_handler(GamePhase::Playing.as_str(), Action::Flap);
        input.add_handler(GamePhase::GameOver.as_str(), Action::Restart);

        let initial = channel.read_initial().unwrap_or(GamePhase::Title);

        log::info!(
            "Game created: theme={}, {}x{}, seed={}, high score={}",
            theme.name(),
            config.width,
            config.height,
            seed,
            high_score.get()
        );

        let mut game = Self {
            canvas,
            config,
            theme,
            audio,
            store,
            channel,
            clock,
            input,
            world,
            phase: GamePhase::Title,
            high_score,
        };
        game.change_state(initial);
        Ok(game)
    }

    /// Enter `next`, applying its entry side effects
    pub fn change_state(&mut self, next: GamePhase) {
        log::info!("State {} -> {}", self.phase, next);
        self.phase = next;
        self.channel.publish(next);

        match next {
            GamePhase::Dying => {
                self.world.death = Some(DeathInfo {
                    position: self.world.bird.pos,
                    started_at_ms: self.clock.now_ms(),
                });
                self.input.set_enabled(false);
            }
            GamePhase::GameOver => self.input.set_enabled(false),
            GamePhase::Playing => self.input.set_enabled(true),
            GamePhase::Title | GamePhase::Ready => {}
        }
    }

    /// Drain queued device events, one action at a time
    fn process_input(&mut self) {
        while let Some(event) = self.input.next_event() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: DeviceEvent) {
        if let Some(action) = self.input.resolve(&event, self.phase) {
            self.perform(action);
        }
    }

    fn perform(&mut self, action: Action) {
        log::debug!("Action {action:?} in {}", self.phase);
        match action {
            Action::ShowReady => {
                self.change_state(GamePhase::Ready);
                self.audio.play(cues::SWOOSH);
            }
            Action::StartRun => {
                self.change_state(GamePhase::Playing);
                self.audio.play(cues::SWOOSH);
            }
            Action::Flap => {
                self.world.bird.flap(self.config.bird.flap_impulse);
                self.audio.play(cues::FLAP);
            }
            Action::Restart => {
                self.reset_game();
                self.audio.play(cues::SWOOSH);
                self.change_state(GamePhase::Ready);
            }
        }
    }

    fn reset_game(&mut self) {
        log::info!("Resetting session (final score {})", self.world.score);
        self.world.reset_session(&self.config);
        self.input.set_enabled(true);
    }

    fn on_collision(&mut self, kind: CollisionKind) {
        log::info!("Hit {kind:?} with score {}", self.world.score);
        self.audio.play(cues::HIT);
        self.high_score.update(self.world.score, self.store.as_mut());
        self.input.set_enabled(false);
        if self.theme.has_death_animation() {
            self.change_state(GamePhase::Dying);
        } else {
            self.change_state(GamePhase::GameOver);
        }
    }

    fn update_playing(&mut self, dt_ms: f32) {
        let outcome = sim::update_playing(&mut self.world, dt_ms, &self.config);
        if outcome.scored > 0 {
            for _ in 0..outcome.scored {
                self.audio.play(cues::SCORE);
            }
            self.high_score.update(self.world.score, self.store.as_mut());
        }
        if let Some(kind) = outcome.collision {
            self.on_collision(kind);
        }
    }

    fn update_dying(&mut self, dt_ms: f32) {
        sim::update_dying(&mut self.world, dt_ms, &self.config);
        // Wall-clock, so batched or skipped ticks do not stretch it
        let started = self
            .world
            .death
            .map_or(f64::NEG_INFINITY, |d| d.started_at_ms);
        if self.clock.now_ms() - started >= self.config.death_duration_ms {
            self.change_state(GamePhase::GameOver);
        }
    }

    /// Advance one fixed step
    pub fn update(&mut self, dt_ms: f32) {
        self.process_input();

        if self.phase.scrolls_background() {
            sim::update_background(&mut self.world, &self.config);
        }

        match self.phase {
            GamePhase::Title | GamePhase::Ready => sim::update_idle(&mut self.world, dt_ms, &self.config),
            GamePhase::Playing => self.update_playing(dt_ms),
            GamePhase::Dying => self.update_dying(dt_ms),
            GamePhase::GameOver => {}
        }

        self.world.time_ticks += 1;
    }

    /// Draw the current state; a missing surface skips the frame
    pub fn render(&mut self) {
        let scene = Scene {
            phase: self.phase,
            world: &self.world,
            high_score: self.high_score.get(),
            hill_samples: self.config.terrain.samples_per_segment,
        };
        match self.canvas.context_2d() {
            Some(surface) => draw_scene(surface, self.theme.as_ref(), &scene),
            None => log::warn!("Drawing surface unavailable, skipping frame"),
        }
    }

    /// Flip and persist the mute flag; returns the new value
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.audio.toggle_mute();
        if let Err(e) = persistence::save_bool(self.store.as_mut(), MUTED_KEY, muted) {
            log::warn!("Failed to save mute flag: {e}");
        }
        muted
    }

    pub fn is_muted(&self) -> bool {
        self.audio.is_muted()
    }

    /// Producer handle for device events
    pub fn input_sender(&self) -> InputSender {
        self.input.sender()
    }

    pub fn input_enabled(&self) -> bool {
        self.input.is_enabled()
    }

    /// Detach input; safe to call more than once
    pub fn cleanup(&mut self) {
        self.input.cleanup();
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn score(&self) -> u32 {
        self.world.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.get()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn theme(&self) -> &dyn Theme {
        self.theme.as_ref()
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

impl<C: Canvas> Simulation for Game<C> {
    fn update(&mut self, dt_ms: f32) {
        Game::update(self, dt_ms);
    }

    fn render(&mut self) {
        Game::render(self);
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
