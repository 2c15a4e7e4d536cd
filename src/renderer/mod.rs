//! 2D rendering module
//!
//! Frames are composed from a handful of immediate-mode primitives on a
//! `Surface`. Themes own the variant-specific draw routines.

pub mod color;
pub mod scene;
pub mod shapes;
pub mod surface;
pub mod theme;

pub use color::Color;
pub use scene::{Scene, draw_scene};
pub use surface::{Canvas, CommandBuffer, DrawCommand, RecordingCanvas, Rect, Surface};
pub use theme::{ClassicTheme, ExplosionEffect, NightFlightTheme, Palette, Theme};
