//! Visual themes
//!
//! A theme supplies the palette, the player and obstacle draw routines and,
//! optionally, a two-frame explosion. Whether a theme has an explosion
//! decides if a collision routes through the dying phase.

use glam::Vec2;

use super::color::Color;
use super::shapes;
use super::surface::{Rect, Surface};

/// Background and text colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub sky_top: Color,
    pub sky_bottom: Color,
    pub ground: Color,
    pub ground_pattern: Color,
    pub hill_back: Color,
    pub hill_front: Color,
    pub cloud: Color,
    /// Text over the sky
    pub text: Color,
}

impl Palette {
    pub fn hill_colors(&self) -> [Color; 2] {
        [self.hill_back, self.hill_front]
    }
}

/// Two-frame death effect
pub trait ExplosionEffect {
    fn draw(&self, surface: &mut dyn Surface, pos: Vec2, frame: u8);
}

/// Per-variant visuals
pub trait Theme {
    fn name(&self) -> &'static str;
    fn palette(&self) -> &Palette;
    fn obstacle_width(&self) -> f32;
    fn draw_player(&self, surface: &mut dyn Surface, pos: Vec2, rotation: f32, wing_frame: u8);
    /// One half of an obstacle; `is_top` halves have their cap at the bottom
    fn draw_obstacle(&self, surface: &mut dyn Surface, x: f32, y: f32, height: f32, is_top: bool);

    fn explosion(&self) -> Option<&dyn ExplosionEffect> {
        None
    }

    fn has_death_animation(&self) -> bool {
        self.explosion().is_some()
    }
}

mod colors {
    use super::Color;

    pub const GOLD: Color = Color::rgb(0xFF, 0xD7, 0x00);
    pub const ORANGE: Color = Color::rgb(0xFF, 0xA5, 0x00);
    pub const CORAL: Color = Color::rgb(0xFF, 0x6B, 0x6B);
    pub const EMERALD: Color = Color::rgb(0x2E, 0xCC, 0x71);
    pub const NEPHRITIS: Color = Color::rgb(0x27, 0xAE, 0x60);
    pub const SKY_BLUE: Color = Color::rgb(0x87, 0xCE, 0xEB);
    pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
    pub const DARK_GRAY: Color = Color::rgb(0x60, 0x60, 0x60);
    pub const SILVER: Color = Color::rgb(0xDD, 0xDD, 0xDD);
    pub const RED_ORANGE: Color = Color::rgb(0xFF, 0x45, 0x00);
    pub const DARK_ORANGE: Color = Color::rgb(0xFF, 0x8C, 0x00);
    pub const DARK_RED: Color = Color::rgb(0x8B, 0x00, 0x00);
}

/// How far an obstacle cap overhangs each side
const CAP_OVERHANG: f32 = 5.0;
const CAP_HEIGHT: f32 = 5.0;

fn draw_cap(surface: &mut dyn Surface, x: f32, y: f32, height: f32, width: f32, is_top: bool, color: Color) {
    let cap_y = if is_top { y + height - CAP_HEIGHT } else { y };
    surface.fill_rect(
        Rect::new(x - CAP_OVERHANG, cap_y, width + CAP_OVERHANG * 2.0, CAP_HEIGHT),
        color,
    );
}

/// Daytime bird between green pipes
#[derive(Debug, Clone)]
pub struct ClassicTheme {
    palette: Palette,
}

impl ClassicTheme {
    pub const PIPE_WIDTH: f32 = 52.0;
    const BODY_RADIUS: f32 = 15.0;

    pub fn new() -> Self {
        Self {
            palette: Palette {
                sky_top: Color::rgb(0x4E, 0xC0, 0xCA),
                sky_bottom: Color::rgb(0x73, 0xD5, 0xF0),
                ground: colors::EMERALD,
                ground_pattern: colors::NEPHRITIS,
                hill_back: Color::rgb(0x1A, 0x8C, 0x4A),
                hill_front: Color::rgb(0x19, 0xB3, 0x5A),
                cloud: Color::WHITE,
                text: Color::BLACK,
            },
        }
    }
}

impl Default for ClassicTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for ClassicTheme {
    fn name(&self) -> &'static str {
        "classic"
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }

    fn obstacle_width(&self) -> f32 {
        Self::PIPE_WIDTH
    }

    fn draw_player(&self, surface: &mut dyn Surface, pos: Vec2, rotation: f32, wing_frame: u8) {
        // Radial falloff as two stacked discs
        surface.fill_circle(pos, Self::BODY_RADIUS, colors::ORANGE);
        surface.fill_circle(pos, Self::BODY_RADIUS * 0.7, colors::GOLD);

        let wing_height = if wing_frame == 1 { 8.0 } else { 12.0 };
        let wing = [
            Vec2::new(-5.0, -wing_height / 2.0),
            Vec2::new(5.0, -wing_height / 2.0),
            Vec2::new(5.0, wing_height / 2.0),
            Vec2::new(-5.0, wing_height / 2.0),
        ];
        surface.fill_polygon(&shapes::transform(&wing, pos, rotation), colors::GOLD);

        let eye = shapes::transform(&[Vec2::new(8.0, -5.0)], pos, rotation);
        surface.fill_circle(eye[0], 3.0, Color::BLACK);

        let beak = [Vec2::new(12.0, 0.0), Vec2::new(20.0, -3.0), Vec2::new(20.0, 3.0)];
        surface.fill_polygon(&shapes::transform(&beak, pos, rotation), colors::CORAL);
    }

    fn draw_obstacle(&self, surface: &mut dyn Surface, x: f32, y: f32, height: f32, is_top: bool) {
        let w = Self::PIPE_WIDTH;
        surface.fill_rect(Rect::new(x, y, w, height), colors::EMERALD);
        // Shaded center band
        surface.fill_rect(Rect::new(x + w * 0.25, y, w * 0.5, height), colors::NEPHRITIS);
        draw_cap(surface, x, y, height, w, is_top, colors::NEPHRITIS);
    }
}

/// Night skyline with a plane and a fireball on impact
#[derive(Debug, Clone)]
pub struct NightFlightTheme {
    palette: Palette,
    explosion: Fireball,
}

impl NightFlightTheme {
    pub const BUILDING_WIDTH: f32 = 70.0;
    const WINDOW_SIZE: f32 = 6.0;
    const WINDOW_SPACING: f32 = 9.0;
    const WINDOW_MARGIN: f32 = 5.0;
    const WINDOWS_ACROSS: usize = 7;

    pub fn new() -> Self {
        Self {
            palette: Palette {
                sky_top: Color::rgb(0x1A, 0x1A, 0x2E),
                sky_bottom: Color::rgb(0x16, 0x21, 0x3E),
                ground: Color::rgb(0x1F, 0x1F, 0x1F),
                ground_pattern: Color::rgb(0x2D, 0x2D, 0x2D),
                hill_back: Color::rgb(0x2D, 0x2D, 0x2D),
                hill_front: Color::rgb(0x3D, 0x3D, 0x3D),
                cloud: Color::WHITE,
                text: Color::WHITE,
            },
            explosion: Fireball,
        }
    }

    fn draw_windows(surface: &mut dyn Surface, x: f32, y: f32, height: f32, is_top: bool) {
        let size = Self::WINDOW_SIZE;
        let margin = Self::WINDOW_MARGIN;
        let across = Self::WINDOWS_ACROSS as f32;
        let total = across * size + (across - 1.0) * (Self::WINDOW_SPACING - size);
        let start_x = x + (Self::BUILDING_WIDTH - total) / 2.0;

        // Rows grow away from the gap
        let start_y = if is_top { y + height - margin - size } else { y + margin };
        let direction = if is_top { -1.0 } else { 1.0 };
        let row_spacing = Self::WINDOW_SPACING + 2.0;
        let rows = ((height - margin * 2.0) / row_spacing).floor().max(0.0) as usize;

        for row in 0..rows {
            let wy = start_y + row as f32 * row_spacing * direction;
            if wy <= y + margin || wy >= y + height - margin - size {
                continue;
            }
            for col in 0..Self::WINDOWS_ACROSS {
                let wx = start_x + col as f32 * Self::WINDOW_SPACING;
                surface.fill_rect(Rect::new(wx, wy, size, size), colors::SKY_BLUE);
            }
        }
    }
}

impl Default for NightFlightTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NightFlightTheme {
    fn name(&self) -> &'static str {
        "night-flight"
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }

    fn obstacle_width(&self) -> f32 {
        Self::BUILDING_WIDTH
    }

    fn draw_player(&self, surface: &mut dyn Surface, pos: Vec2, rotation: f32, _wing_frame: u8) {
        // Fuselage as an elongated octagon
        let body: Vec<Vec2> = (0..8)
            .map(|i| {
                let a = i as f32 / 8.0 * std::f32::consts::TAU;
                Vec2::new(a.cos() * 20.0, a.sin() * 8.0)
            })
            .collect();
        surface.fill_polygon(&shapes::transform(&body, pos, rotation), Color::WHITE);

        let wing = [Vec2::new(-10.0, 0.0), Vec2::new(0.0, -15.0), Vec2::new(10.0, 0.0)];
        surface.fill_polygon(&shapes::transform(&wing, pos, rotation), colors::SILVER);

        let tail = [Vec2::new(15.0, 0.0), Vec2::new(20.0, -8.0), Vec2::new(20.0, 0.0)];
        surface.fill_polygon(&shapes::transform(&tail, pos, rotation), colors::SILVER);

        let windows: Vec<Vec2> = (-12..=8).step_by(5).map(|i| Vec2::new(i as f32, -3.0)).collect();
        for w in shapes::transform(&windows, pos, rotation) {
            surface.fill_circle(w, 1.5, colors::SKY_BLUE);
        }
    }

    fn draw_obstacle(&self, surface: &mut dyn Surface, x: f32, y: f32, height: f32, is_top: bool) {
        let w = Self::BUILDING_WIDTH;
        surface.fill_rect(Rect::new(x, y, w, height), colors::GRAY);
        surface.fill_rect(Rect::new(x + w * 0.25, y, w * 0.5, height), colors::DARK_GRAY);
        Self::draw_windows(surface, x, y, height, is_top);
        draw_cap(surface, x, y, height, w, is_top, colors::DARK_GRAY);
    }

    fn explosion(&self) -> Option<&dyn ExplosionEffect> {
        Some(&self.explosion)
    }
}

/// Flame burst alternating between a large bright frame and a smaller
/// darker one
#[derive(Debug, Clone, Copy)]
pub struct Fireball;

impl Fireball {
    /// Flame lengths vary by a fixed pattern so frames are reproducible
    fn flame_lengths(rays: usize, base: f32, spread: f32) -> Vec<f32> {
        (0..rays)
            .map(|i| base + spread * ((i * 7) % rays) as f32 / rays as f32)
            .collect()
    }
}

impl ExplosionEffect for Fireball {
    fn draw(&self, surface: &mut dyn Surface, pos: Vec2, frame: u8) {
        if frame == 0 {
            let flames = shapes::starburst(pos, 12.0, &Self::flame_lengths(12, 34.0, 10.0));
            surface.fill_polygon(&flames, colors::RED_ORANGE);
            surface.fill_circle(pos, 30.0, colors::RED_ORANGE);
            surface.fill_circle(pos, 18.0, colors::GOLD);
            surface.fill_circle(pos, 8.0, Color::WHITE);
        } else {
            let flames = shapes::starburst(pos, 10.0, &Self::flame_lengths(8, 32.0, 15.0));
            surface.fill_polygon(&flames, colors::DARK_ORANGE);
            surface.fill_circle(pos, 25.0, colors::DARK_RED);
            surface.fill_circle(pos, 15.0, colors::RED_ORANGE);
            surface.fill_circle(pos, 7.0, colors::GOLD);
        }
    }
}
