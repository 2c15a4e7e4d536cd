//! Per-phase simulation updates
//!
//! Each function advances the world by one fixed step for one phase and
//! reports what happened. Side effects (sounds, phase changes, persistence)
//! belong to the orchestrator.

use super::collision::{CollisionKind, bird_hits_ground, bird_hits_pipe, bird_passed_pipe};
use super::pipe::Pipe;
use super::state::World;
use crate::settings::GameConfig;

/// Result of one playing tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayOutcome {
    /// Pipes passed this tick
    pub scored: u32,
    /// First collision found, if any
    pub collision: Option<CollisionKind>,
    /// The tick was skipped because the bird state was unusable
    pub skipped: bool,
}

/// Scroll clouds, both hill layers and the ground stripes
pub fn update_background(world: &mut World, config: &GameConfig) {
    let repeat_width = world.repeat_width();
    for cloud in &mut world.clouds {
        cloud.update(&mut world.rng, repeat_width, world.height);
    }
    world.back_hills.update();
    world.front_hills.update();
    world.ground_offset =
        (world.ground_offset - config.ground_speed) % crate::consts::GROUND_STRIPE_PERIOD;
}

/// Title and ready: the bird floats, nothing else moves
pub fn update_idle(world: &mut World, dt_ms: f32, config: &GameConfig) {
    world.bird.update_floating(dt_ms, &config.bird);
}

/// Full physics, spawning, collision and scoring
pub fn update_playing(world: &mut World, dt_ms: f32, config: &GameConfig) -> PlayOutcome {
    let mut outcome = PlayOutcome::default();

    if !world.bird.is_finite() {
        log::warn!("Bird state is not finite, skipping tick");
        outcome.skipped = true;
        return outcome;
    }

    world.bird.update(dt_ms, &config.bird);

    if world.spawner.tick(dt_ms) {
        let pipe = Pipe::spawn(
            &mut world.rng,
            world.width,
            world.ground_line,
            config.pipes.gap_height,
            world.obstacle_width,
        );
        log::debug!("Spawned pipe with gap at {:.1}", pipe.gap_y);
        world.pipes.push(pipe);
    }

    let bird_pos = world.bird.pos;
    let radius = world.bird.radius;

    // Move, cull, collide and score in one pass
    for i in (0..world.pipes.len()).rev() {
        let pipe = &mut world.pipes[i];
        pipe.advance(config.pipes.speed);

        if !pipe.x.is_finite() {
            log::warn!("Dropping pipe with non-finite position");
            world.pipes.remove(i);
            continue;
        }

        if pipe.is_offscreen() {
            world.pipes.remove(i);
            continue;
        }

        if bird_hits_pipe(bird_pos, radius, pipe) {
            outcome.collision = Some(CollisionKind::Pipe);
            return outcome;
        }

        if bird_passed_pipe(bird_pos.x, pipe) {
            pipe.scored = true;
            world.score += 1;
            outcome.scored += 1;
        }
    }

    if bird_hits_ground(bird_pos, radius, world.ground_line) {
        outcome.collision = Some(CollisionKind::Ground);
    }

    outcome
}

/// Dying: only the explosion animation advances
pub fn update_dying(world: &mut World, dt_ms: f32, config: &GameConfig) {
    world
        .explosion
        .advance(dt_ms, config.explosion_frame_interval_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_STEP_MS;
    use crate::renderer::Color;
    use crate::sim::pipe::PipeSpawner;
    use proptest::prelude::*;

    const DT: f32 = SIM_STEP_MS as f32;

    /// A world where the bird hangs still and nothing spawns on its own
    fn still_world() -> (World, GameConfig) {
        let mut config = GameConfig::default();
        config.bird.gravity = 0.0;
        let colors = [Color::rgb(0, 0, 0), Color::rgb(0, 0, 0)];
        let mut world = World::new(&config, 52.0, colors, 5);
        world.spawner = PipeSpawner::primed(f32::MAX);
        (world, config)
    }

    #[test]
    fn test_first_playing_tick_spawns() {
        let config = GameConfig::default();
        let colors = [Color::rgb(0, 0, 0), Color::rgb(0, 0, 0)];
        let mut world = World::new(&config, 52.0, colors, 5);
        update_playing(&mut world, DT, &config);
        assert_eq!(world.pipes.len(), 1);
        // Spawned at the right edge, then moved this same tick
        assert_eq!(world.pipes[0].x, 320.0 - config.pipes.speed);
    }

    #[test]
    fn test_pipe_scores_once() {
        let (mut world, config) = still_world();
        world.pipes.push(Pipe::new(120.0, 240.0, 150.0, 52.0));

        let mut total = 0;
        for _ in 0..200 {
            let outcome = update_playing(&mut world, DT, &config);
            assert!(outcome.collision.is_none());
            total += outcome.scored;
        }
        assert_eq!(total, 1);
        assert_eq!(world.score, 1);
    }

    #[test]
    fn test_offscreen_pipe_removed_in_same_pass() {
        let (mut world, config) = still_world();
        world.pipes.push(Pipe::new(-51.0, 240.0, 150.0, 52.0));
        world.pipes.push(Pipe::new(200.0, 240.0, 150.0, 52.0));
        update_playing(&mut world, DT, &config);
        assert_eq!(world.pipes.len(), 1);
        assert_eq!(world.pipes[0].x, 198.0);
    }

    #[test]
    fn test_pipe_collision_stops_pass() {
        let (mut world, config) = still_world();
        world.pipes.push(Pipe::new(92.0, 100.0, 150.0, 52.0));
        let outcome = update_playing(&mut world, DT, &config);
        assert_eq!(outcome.collision, Some(CollisionKind::Pipe));
        assert_eq!(outcome.scored, 0);
    }

    #[test]
    fn test_ground_collision() {
        let config = GameConfig::default();
        let colors = [Color::rgb(0, 0, 0), Color::rgb(0, 0, 0)];
        let mut world = World::new(&config, 52.0, colors, 5);
        world.spawner = PipeSpawner::primed(f32::MAX);

        let mut ticks = 0;
        let outcome = loop {
            let outcome = update_playing(&mut world, DT, &config);
            ticks += 1;
            if outcome.collision.is_some() || ticks > 1000 {
                break outcome;
            }
        };
        assert_eq!(outcome.collision, Some(CollisionKind::Ground));
        assert!(world.bird.pos.y + world.bird.radius > world.ground_line);
    }

    #[test]
    fn test_non_finite_bird_skips_tick() {
        let (mut world, config) = still_world();
        world.bird.velocity = f32::NAN;
        world.pipes.push(Pipe::new(200.0, 240.0, 150.0, 52.0));
        let outcome = update_playing(&mut world, DT, &config);
        assert!(outcome.skipped);
        assert_eq!(world.pipes[0].x, 200.0);
    }

    #[test]
    fn test_background_scrolls() {
        let (mut world, config) = still_world();
        let cloud_x = world.clouds[0].x;
        update_background(&mut world, &config);
        assert_eq!(world.ground_offset, -2.0);
        assert_eq!(world.back_hills.offset, -0.5);
        assert_eq!(world.front_hills.offset, -0.7);
        assert!(world.clouds[0].x < cloud_x || world.clouds[0].x == world.repeat_width());

        for _ in 0..9 {
            update_background(&mut world, &config);
        }
        // Stripe period is 20px
        assert_eq!(world.ground_offset, 0.0);
    }

    #[test]
    fn test_dying_toggles_explosion() {
        let (mut world, config) = still_world();
        for _ in 0..13 {
            update_dying(&mut world, DT, &config);
        }
        assert_eq!(world.explosion.frame, 1);
    }

    proptest! {
        #[test]
        fn each_pipe_scores_at_most_once(offsets in proptest::collection::vec(0.0f32..400.0, 1..6)) {
            let (mut world, config) = still_world();
            for (i, offset) in offsets.iter().enumerate() {
                world.pipes.push(Pipe::new(120.0 + offset + i as f32 * 60.0, 240.0, 150.0, 52.0));
            }
            let count = offsets.len() as u32;
            let mut total = 0;
            for _ in 0..600 {
                let outcome = update_playing(&mut world, DT, &config);
                prop_assert!(outcome.collision.is_none());
                total += outcome.scored;
            }
            prop_assert_eq!(total, count);
            prop_assert_eq!(world.score, count);
        }
    }
}
