//! Drawing surface contract
//!
//! The playfield is a fixed-size 2D surface drawn synchronously during
//! `render()`. `CommandBuffer` records draw calls instead of rasterizing,
//! which is what the headless driver and the tests draw into.

use glam::Vec2;

use super::color::Color;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Immediate-mode 2D drawing
pub trait Surface {
    /// Start a new frame
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Text centered horizontally on `pos`
    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
}

/// A host that may or may not be able to hand out a 2D surface
pub trait Canvas {
    /// Playfield size in pixels
    fn size(&self) -> (u32, u32);
    fn context_2d(&mut self) -> Option<&mut dyn Surface>;
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        rect: Rect,
        color: Color,
    },
    Gradient {
        rect: Rect,
        top: Color,
        bottom: Color,
    },
    Polygon {
        points: Vec<Vec2>,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
    },
}

/// Surface that keeps the draw calls of the current frame
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
    /// Number of frames started
    pub frames: u64,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn this frame
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }
}

impl Surface for CommandBuffer {
    fn clear(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color) {
        self.commands.push(DrawCommand::Gradient { rect, top, bottom });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            color,
        });
    }
}

/// Canvas backed by a `CommandBuffer`; can simulate a lost context
#[derive(Debug)]
pub struct RecordingCanvas {
    pub width: u32,
    pub height: u32,
    pub buffer: CommandBuffer,
    pub available: bool,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: CommandBuffer::new(),
            available: true,
        }
    }

    /// A canvas that never yields a surface
    pub fn unavailable(width: u32, height: u32) -> Self {
        Self {
            available: false,
            ..Self::new(width, height)
        }
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn context_2d(&mut self) -> Option<&mut dyn Surface> {
        if self.available {
            Some(&mut self.buffer)
        } else {
            None
        }
    }
}
