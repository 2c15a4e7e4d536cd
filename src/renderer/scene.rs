//! Per-phase frame composition
//!
//! Draws the latest discrete world state; no interpolation between ticks.

use glam::Vec2;

use super::color::Color;
use super::shapes;
use super::surface::{Rect, Surface};
use super::theme::Theme;
use crate::consts::{GROUND_STRIPE_PERIOD, GROUND_STRIPE_WIDTH};
use crate::sim::{GamePhase, Pipe, World};

pub const TITLE_TEXT: &str = "Flappy Bird";

/// Everything a frame needs besides the theme
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub phase: GamePhase,
    pub world: &'a World,
    pub high_score: u32,
    /// Curve samples per hill interval
    pub hill_samples: u32,
}

/// Draw one complete frame
pub fn draw_scene(surface: &mut dyn Surface, theme: &dyn Theme, scene: &Scene<'_>) {
    surface.clear();
    draw_background(surface, theme, scene.world, scene.hill_samples);

    let world = scene.world;
    let center = Vec2::new(world.width / 2.0, world.height / 2.0);
    let text = theme.palette().text;

    match scene.phase {
        GamePhase::Title => {
            surface.fill_text(TITLE_TEXT, center - Vec2::Y * 40.0, 40.0, text);
            surface.fill_text("Click to Start", center + Vec2::Y * 20.0, 20.0, text);
            if scene.high_score > 0 {
                let line = format!("High Score: {}", scene.high_score);
                surface.fill_text(&line, center + Vec2::Y * 60.0, 24.0, text);
            }
            draw_bird(surface, theme, world);
        }
        GamePhase::Ready => {
            draw_bird(surface, theme, world);
            surface.fill_text("Ready!", center - Vec2::Y * 40.0, 40.0, text);
            surface.fill_text("Click to Begin", center + Vec2::Y * 20.0, 20.0, text);
        }
        GamePhase::Playing => {
            draw_pipes(surface, theme, world);
            draw_bird(surface, theme, world);
            draw_score(surface, world, text);
        }
        GamePhase::Dying => {
            draw_pipes(surface, theme, world);
            draw_explosion(surface, theme, world);
            draw_score(surface, world, Color::WHITE);
        }
        GamePhase::GameOver => {
            draw_pipes(surface, theme, world);
            if !draw_explosion(surface, theme, world) {
                draw_bird(surface, theme, world);
            }
            surface.fill_rect(
                Rect::new(0.0, 0.0, world.width, world.height),
                Color::BLACK.with_alpha(0.5),
            );
            let white = Color::WHITE;
            surface.fill_text("Game Over", center - Vec2::Y * 50.0, 40.0, white);
            surface.fill_text(&format!("Score: {}", world.score), center, 30.0, white);
            let best = format!("High Score: {}", scene.high_score);
            surface.fill_text(&best, center + Vec2::Y * 40.0, 30.0, white);
            surface.fill_text("Click to Try Again", center + Vec2::Y * 80.0, 20.0, white);
        }
    }
}

fn draw_background(surface: &mut dyn Surface, theme: &dyn Theme, world: &World, hill_samples: u32) {
    let palette = theme.palette();
    surface.fill_vertical_gradient(
        Rect::new(0.0, 0.0, world.width, world.height),
        palette.sky_top,
        palette.sky_bottom,
    );

    for cloud in &world.clouds {
        if cloud.x > world.width || cloud.x + cloud.width < 0.0 {
            continue;
        }
        let color = palette.cloud.with_alpha(cloud.opacity);
        for (center, radius) in shapes::cloud_puffs(cloud) {
            surface.fill_circle(center, radius, color);
        }
    }

    for hill in [&world.back_hills, &world.front_hills] {
        let outline = hill.silhouette(world.width, world.ground_line, hill_samples);
        surface.fill_polygon(&outline, hill.color);
    }

    let ground_height = world.height - world.ground_line;
    surface.fill_rect(
        Rect::new(0.0, world.ground_line, world.width, ground_height),
        palette.ground,
    );
    let mut x = world.ground_offset;
    while x < world.width {
        surface.fill_rect(
            Rect::new(x, world.ground_line, GROUND_STRIPE_WIDTH, ground_height),
            palette.ground_pattern,
        );
        x += GROUND_STRIPE_PERIOD;
    }
}

fn draw_pipe(surface: &mut dyn Surface, theme: &dyn Theme, pipe: &Pipe, ground_line: f32) {
    theme.draw_obstacle(surface, pipe.x, 0.0, pipe.gap_top(), true);
    theme.draw_obstacle(
        surface,
        pipe.x,
        pipe.gap_bottom(),
        ground_line - pipe.gap_bottom(),
        false,
    );
}

fn draw_pipes(surface: &mut dyn Surface, theme: &dyn Theme, world: &World) {
    for pipe in &world.pipes {
        draw_pipe(surface, theme, pipe, world.ground_line);
    }
}

fn draw_bird(surface: &mut dyn Surface, theme: &dyn Theme, world: &World) {
    let bird = &world.bird;
    theme.draw_player(surface, bird.pos, bird.rotation, bird.wing_frame);
}

/// Draws the explosion at the death position; false if there is nothing
/// to draw
fn draw_explosion(surface: &mut dyn Surface, theme: &dyn Theme, world: &World) -> bool {
    match (theme.explosion(), world.death) {
        (Some(effect), Some(death)) => {
            effect.draw(surface, death.position, world.explosion.frame);
            true
        }
        _ => false,
    }
}

fn draw_score(surface: &mut dyn Surface, world: &World, color: Color) {
    surface.fill_text(
        &world.score.to_string(),
        Vec2::new(world.width / 2.0, 50.0),
        40.0,
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{ClassicTheme, CommandBuffer, DrawCommand, NightFlightTheme};
    use crate::settings::GameConfig;
    use crate::sim::DeathInfo;

    fn world(theme: &dyn Theme) -> World {
        World::new(
            &GameConfig::default(),
            theme.obstacle_width(),
            theme.palette().hill_colors(),
            3,
        )
    }

    fn draw(theme: &dyn Theme, world: &World, phase: GamePhase, high_score: u32) -> CommandBuffer {
        let mut buf = CommandBuffer::new();
        let scene = Scene {
            phase,
            world,
            high_score,
            hill_samples: 8,
        };
        draw_scene(&mut buf, theme, &scene);
        buf
    }

    #[test]
    fn test_background_first() {
        let theme = ClassicTheme::new();
        let w = world(&theme);
        let buf = draw(&theme, &w, GamePhase::Title, 0);
        assert_eq!(buf.frames, 1);
        assert!(matches!(buf.commands[0], DrawCommand::Gradient { .. }));
    }

    #[test]
    fn test_ground_stripes() {
        let theme = ClassicTheme::new();
        let w = world(&theme);
        let buf = draw(&theme, &w, GamePhase::Ready, 0);
        let stripes = buf
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { rect, .. } if rect.w == GROUND_STRIPE_WIDTH && rect.y == w.ground_line))
            .count();
        assert_eq!(stripes, 16);
    }

    #[test]
    fn test_title_high_score_only_when_positive() {
        let theme = ClassicTheme::new();
        let w = world(&theme);
        assert!(!draw(&theme, &w, GamePhase::Title, 0).contains_text("High Score"));
        assert!(draw(&theme, &w, GamePhase::Title, 4).contains_text("High Score: 4"));
        assert!(draw(&theme, &w, GamePhase::Title, 0).contains_text(TITLE_TEXT));
    }

    #[test]
    fn test_playing_shows_score() {
        let theme = ClassicTheme::new();
        let mut w = world(&theme);
        w.score = 7;
        let buf = draw(&theme, &w, GamePhase::Playing, 0);
        assert_eq!(buf.texts(), vec!["7"]);
    }

    #[test]
    fn test_game_over_overlay_and_text() {
        let theme = ClassicTheme::new();
        let mut w = world(&theme);
        w.score = 3;
        let buf = draw(&theme, &w, GamePhase::GameOver, 9);
        assert!(buf.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Rect { color, .. } if *color == Color::rgba(0, 0, 0, 128)
        )));
        assert_eq!(
            buf.texts(),
            vec!["Game Over", "Score: 3", "High Score: 9", "Click to Try Again"]
        );
    }

    #[test]
    fn test_game_over_explosion_replaces_bird() {
        let theme = NightFlightTheme::new();
        let mut w = world(&theme);
        let death_pos = Vec2::new(111.0, 222.0);
        w.death = Some(DeathInfo {
            position: death_pos,
            started_at_ms: 0.0,
        });
        let buf = draw(&theme, &w, GamePhase::GameOver, 0);
        assert!(buf.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Circle { center, radius, .. } if *center == death_pos && *radius == 30.0
        )));
    }

    #[test]
    fn test_pipe_halves_span_to_ground() {
        let theme = ClassicTheme::new();
        let mut w = world(&theme);
        w.pipes.push(Pipe::new(150.0, 200.0, 150.0, 52.0));
        let buf = draw(&theme, &w, GamePhase::Playing, 0);
        let bodies: Vec<Rect> = buf
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { rect, .. } if rect.x == 150.0 && rect.w == 52.0 => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0].h, 125.0);
        assert_eq!(bodies[1].y, 275.0);
        assert_eq!(bodies[1].y + bodies[1].h, w.ground_line);
    }
}
