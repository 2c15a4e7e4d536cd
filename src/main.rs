//! Flappy Sim entry point
//!
//! Native headless driver: loads the configuration, builds the game on a
//! recording canvas and plays a scripted session through the fixed-timestep
//! loop with a simple autopilot.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use flappy_sim::audio::{AudioService, NullBackend};
use flappy_sim::input::{InputSender, KeyCode};
use flappy_sim::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
use flappy_sim::platform::{FragmentChannel, ManualClock};
use flappy_sim::renderer::{ClassicTheme, NightFlightTheme, RecordingCanvas, Theme};
use flappy_sim::sim::GamePhase;
use flappy_sim::{Game, GameConfig, GameLoop, GameServices};

/// Display refresh used to pace the scripted session
const DISPLAY_HZ: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeChoice {
    /// Bird between green pipes
    #[value(alias = "bird")]
    Classic,
    /// Plane between buildings, explodes on impact
    #[value(alias = "plane")]
    Night,
}

impl ThemeChoice {
    fn build(self) -> Box<dyn Theme> {
        match self {
            ThemeChoice::Classic => Box::new(ClassicTheme::new()),
            ThemeChoice::Night => Box::new(NightFlightTheme::new()),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "flappy-sim")]
#[command(about = "Plays scripted headless sessions of the flappy simulation")]
struct Cli {
    /// JSON configuration file (partial files keep defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON file persisting the high score and mute flag
    #[arg(long)]
    store: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = ThemeChoice::Classic)]
    theme: ThemeChoice,
    /// Wall-clock seconds to simulate at most
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,
    /// Stop after this many finished runs
    #[arg(long, default_value_t = 3)]
    runs: u32,
    /// RNG seed (overrides the configuration)
    #[arg(long)]
    seed: Option<u64>,
    /// Cue volume, 0.0 - 1.0 (overrides the configuration)
    #[arg(long)]
    volume: Option<f32>,
}

/// Flap when the bird sinks below the middle of the next gap
fn autopilot(game: &Game<RecordingCanvas>, input: &InputSender, now_ms: f64) {
    let world = game.world();
    match game.phase() {
        GamePhase::Title | GamePhase::Ready => {
            input.pointer(now_ms);
        }
        GamePhase::Playing => {
            let bird = &world.bird;
            let target = world
                .pipes
                .iter()
                .find(|p| p.right() > bird.pos.x - bird.radius)
                .map_or(world.height * 0.45, |p| p.gap_y + p.gap_height * 0.15);
            if bird.pos.y > target && bird.velocity > 0.0 {
                input.key(KeyCode::Space, now_ms);
            }
        }
        GamePhase::Dying | GamePhase::GameOver => {}
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flappy Sim (headless) starting...");

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load_or_default(path),
        None => GameConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(volume) = cli.volume {
        config.master_volume = volume;
    }

    let theme = cli.theme.build();

    let store: Box<dyn KeyValueStore> = match &cli.store {
        Some(path) => Box::new(JsonFileStore::open(path)),
        None => Box::new(MemoryStore::new()),
    };
    let clock = ManualClock::new(0.0);
    let channel = FragmentChannel::new();
    let audio = AudioService::for_theme(Box::new(NullBackend), theme.has_death_animation());
    let services = GameServices {
        theme,
        audio,
        store,
        channel: Box::new(channel.clone()),
        clock: Box::new(clock.clone()),
    };

    let canvas = RecordingCanvas::new(config.width, config.height);
    let mut game_loop = GameLoop::with_cap(config.max_catch_up_steps);
    let mut game = match Game::new(canvas, config, services) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to start: {e}");
            std::process::exit(1);
        }
    };
    let input = game.input_sender();

    let frame_ms = 1000.0 / DISPLAY_HZ;
    let total_frames = (cli.seconds * DISPLAY_HZ).ceil() as u64;
    let mut runs_finished = 0;
    let mut best_run = 0;
    let mut last_phase = game.phase();

    for frame in 0..total_frames {
        let now = frame as f64 * frame_ms;
        clock.set(now);

        let phase = game.phase();
        if phase != last_phase {
            log::debug!("Published {}", channel.fragment());
            if phase == GamePhase::GameOver {
                runs_finished += 1;
                best_run = best_run.max(game.score());
                log::info!("Run {runs_finished} ended with score {}", game.score());
                if runs_finished >= cli.runs {
                    break;
                }
            }
            last_phase = phase;
        }

        if phase == GamePhase::GameOver {
            input.pointer(now);
        } else {
            autopilot(&game, &input, now);
        }

        let outcome = game_loop.frame(now, &mut game);
        if !outcome.keep_running {
            break;
        }
    }

    game_loop.stop();
    game.cleanup();

    let canvas = game.canvas();
    println!("theme:        {}", game.theme().name());
    println!("runs:         {runs_finished}");
    println!("best run:     {best_run}");
    println!("high score:   {}", game.high_score());
    println!("final state:  {}", channel.fragment());
    println!(
        "frames drawn: {} ({} commands in last frame)",
        canvas.buffer.frames,
        canvas.buffer.commands.len()
    );
}
