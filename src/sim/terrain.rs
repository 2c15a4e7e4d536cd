//! Procedural parallax terrain
//!
//! A hill layer is a fixed sequence of control points spanning
//! `repeat_width` (five viewports by default). Heights come from three
//! summed sine waves plus bounded jitter, clamped to a band above the
//! ground line. The last few points ramp toward the first point's height
//! and a closing point at `repeat_width` repeats it exactly, so the
//! silhouette tiles with no seam. Points are generated once; the layer is
//! only ever scrolled.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::renderer::Color;
use crate::settings::HillLayerConfig;
use crate::smoothstep;

/// Interpolation between consecutive control points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Smoothing {
    /// Cubic Bézier with flat tangents at each control point
    Bezier,
    /// Catmull-Rom spline through the control points (cyclic)
    CatmullRom,
}

/// Depth layer, drawn back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HillLayer {
    Back,
    Front,
}

/// One sine component of the silhouette
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wave {
    /// Spatial frequency (radians per pixel)
    pub frequency: f32,
    pub amplitude: f32,
}

/// Shape parameters shared by both layers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Width of one segment and the number of control points in it
    pub segment_width: f32,
    pub points_per_segment: u32,
    /// Silhouette sits this far above the ground line
    pub height_offset: f32,
    /// Base height above `ground_line - height_offset`
    pub base_rise: f32,
    /// Clamp band, measured up from `ground_line - height_offset`
    pub min_rise: f32,
    pub max_rise: f32,
    /// First point rise is sampled from `first_rise_min..first_rise_min + first_rise_span`
    pub first_rise_min: f32,
    pub first_rise_span: f32,
    /// Increasing frequency, decreasing amplitude
    pub waves: [Wave; 3],
    /// Uniform jitter in `-jitter..jitter`
    pub jitter: f32,
    /// Points ramped toward the first point before the sequence closes
    pub transition_points: usize,
    /// Maximum height difference allowed across the wrap point
    pub seam_tolerance: f32,
    /// Repeat span in viewport widths
    pub repeat_viewports: f32,
    /// Polyline samples per segment when tessellating for drawing
    pub samples_per_segment: u32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            segment_width: 160.0,
            points_per_segment: 4,
            height_offset: 50.0,
            base_rise: 100.0,
            min_rise: 60.0,
            max_rise: 200.0,
            first_rise_min: 60.0,
            first_rise_span: 80.0,
            waves: [
                Wave {
                    frequency: 0.003,
                    amplitude: 40.0,
                },
                Wave {
                    frequency: 0.007,
                    amplitude: 30.0,
                },
                Wave {
                    frequency: 0.02,
                    amplitude: 15.0,
                },
            ],
            jitter: 10.0,
            transition_points: 4,
            seam_tolerance: 0.5,
            repeat_viewports: crate::consts::REPEAT_VIEWPORTS,
            samples_per_segment: 8,
        }
    }
}

/// Control points are never closer than this (px)
pub const MIN_POINT_SPACING: f32 = 1.0;

impl TerrainParams {
    /// Nominal spacing between control points, at least `MIN_POINT_SPACING`
    pub fn point_spacing(&self) -> f32 {
        (self.segment_width / self.points_per_segment.max(1) as f32).max(MIN_POINT_SPACING)
    }
}

/// A scrolling hill layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hill {
    pub layer: HillLayer,
    /// Control points from x = 0 to x = repeat_width inclusive
    pub points: Vec<Vec2>,
    /// Horizontal scroll offset, in (-repeat_width, 0]
    pub offset: f32,
    pub speed: f32,
    pub color: Color,
    pub smoothing: Smoothing,
    pub repeat_width: f32,
    pub spacing: f32,
}

impl Hill {
    /// Generate a layer for the given viewport
    pub fn generate(
        layer: HillLayer,
        config: &HillLayerConfig,
        params: &TerrainParams,
        viewport_width: f32,
        ground_line: f32,
        color: Color,
        rng: &mut impl Rng,
    ) -> Self {
        let mut repeat_width = viewport_width * params.repeat_viewports;
        if !(repeat_width.is_finite() && repeat_width >= MIN_POINT_SPACING) {
            log::warn!("Hill repeat width {repeat_width} unusable, using one viewport");
            repeat_width = viewport_width.max(MIN_POINT_SPACING);
        }
        // Snap spacing so the sequence closes exactly at repeat_width
        let intervals = (repeat_width / params.point_spacing()).round().max(1.0) as usize;
        let spacing = repeat_width / intervals as f32;
        let points = generate_points(params, intervals, spacing, ground_line, rng);

        Self {
            layer,
            points,
            offset: 0.0,
            speed: config.speed,
            color,
            smoothing: config.smoothing,
            repeat_width,
            spacing,
        }
    }

    /// Scroll left by this layer's speed, wrapping after a full repeat
    pub fn update(&mut self) {
        self.offset -= self.speed;
        if self.offset <= -self.repeat_width {
            self.offset = 0.0;
        }
    }

    /// Number of intervals (the closing point duplicates point 0)
    #[inline]
    fn intervals(&self) -> usize {
        self.points.len() - 1
    }

    /// Height of control point `i`, wrapping around the repeat span
    #[inline]
    fn cyclic_y(&self, i: isize) -> f32 {
        let n = self.intervals() as isize;
        self.points[i.rem_euclid(n) as usize].y
    }

    /// Height within interval `i` (any integer, wrapped) at parameter `t`
    fn segment_y(&self, i: isize, t: f32) -> f32 {
        let y1 = self.cyclic_y(i);
        let y2 = self.cyclic_y(i + 1);
        match self.smoothing {
            Smoothing::Bezier => y1 + (y2 - y1) * smoothstep(t),
            Smoothing::CatmullRom => {
                let y0 = self.cyclic_y(i - 1);
                let y3 = self.cyclic_y(i + 2);
                let t2 = t * t;
                let t3 = t2 * t;
                0.5 * (2.0 * y1
                    + (y2 - y0) * t
                    + (2.0 * y0 - 5.0 * y1 + 4.0 * y2 - y3) * t2
                    + (3.0 * y1 - y0 - 3.0 * y2 + y3) * t3)
            }
        }
    }

    /// Silhouette height at pattern-space `x`. Values in `[0, repeat_width]`
    /// are evaluated directly; anything else wraps.
    pub fn height_at(&self, x: f32) -> f32 {
        let x = if (0.0..=self.repeat_width).contains(&x) {
            x
        } else {
            x.rem_euclid(self.repeat_width)
        };
        let n = self.intervals();
        let index = ((x / self.spacing).floor() as usize).min(n - 1);
        let t = (x - index as f32 * self.spacing) / self.spacing;
        self.segment_y(index as isize, t)
    }

    /// Control-point intervals visible in a viewport at the current offset.
    /// Indices past the last interval wrap to the start of the pattern.
    pub fn visible_intervals(&self, viewport_width: f32) -> std::ops::Range<usize> {
        let start = (-self.offset / self.spacing).floor().max(0.0) as usize;
        let count = (viewport_width / self.spacing).ceil() as usize + 1;
        start..start + count
    }

    /// Closed fill polygon for the visible window, from the ground line up
    /// to the silhouette and back down
    pub fn silhouette(&self, viewport_width: f32, ground_line: f32, samples: u32) -> Vec<Vec2> {
        let samples = samples.max(1);
        let range = self.visible_intervals(viewport_width);
        let mut outline = Vec::with_capacity(range.len() * samples as usize + 4);
        outline.push(Vec2::new(0.0, ground_line));
        let last = range.end.saturating_sub(1);
        for i in range {
            for s in 0..samples {
                let t = s as f32 / samples as f32;
                let x = (i as f32 + t) * self.spacing + self.offset;
                outline.push(Vec2::new(x, self.segment_y(i as isize, t)));
            }
        }
        // End of the last interval, at or past the right edge
        let end_x = (last + 1) as f32 * self.spacing + self.offset;
        outline.push(Vec2::new(end_x, self.segment_y(last as isize, 1.0)));
        outline.push(Vec2::new(viewport_width, ground_line));
        outline
    }
}

fn generate_points(
    params: &TerrainParams,
    intervals: usize,
    spacing: f32,
    ground_line: f32,
    rng: &mut impl Rng,
) -> Vec<Vec2> {
    let top = ground_line - params.height_offset;
    let highest = top - params.max_rise;
    let lowest = top - params.min_rise;
    let base = top - params.base_rise;

    let mut points = Vec::with_capacity(intervals + 1);
    let first_y = top - (params.first_rise_min + rng.random::<f32>() * params.first_rise_span);
    points.push(Vec2::new(0.0, first_y.clamp(highest, lowest)));

    let transition = params.transition_points.min(intervals.saturating_sub(2));
    let anchor = intervals - transition - 1;

    for i in 1..=anchor {
        let x = i as f32 * spacing;
        let variation: f32 = params
            .waves
            .iter()
            .map(|w| (x * w.frequency).sin() * w.amplitude)
            .sum();
        let jitter = (rng.random::<f32>() * 2.0 - 1.0) * params.jitter;
        points.push(Vec2::new(x, (base + variation + jitter).clamp(highest, lowest)));
    }

    // Ramp toward the first height; the final ratio is 1, closing the loop
    let anchor_y = points[anchor].y;
    let first_y = points[0].y;
    let steps = (intervals - anchor) as f32;
    for i in anchor + 1..=intervals {
        let ratio = (i - anchor) as f32 / steps;
        points.push(Vec2::new(
            i as f32 * spacing,
            crate::lerp(anchor_y, first_y, ratio),
        ));
    }

    points
}
