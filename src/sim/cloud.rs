//! Parallax cloud pool
//!
//! Fixed-size pool; a cloud that scrolls off the left edge is recycled in
//! place at the far right of the repeat span with fresh attributes.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which silhouette a cloud is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudShape {
    Rounded,
    Elongated,
    Clustered,
}

impl CloudShape {
    fn sample(rng: &mut impl Rng) -> Self {
        match rng.random_range(0..3) {
            0 => CloudShape::Rounded,
            1 => CloudShape::Elongated,
            _ => CloudShape::Clustered,
        }
    }
}

/// A background cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Leftward movement per tick
    pub speed: f32,
    pub opacity: f32,
    pub shape: CloudShape,
}

impl Cloud {
    /// A cloud placed anywhere across the repeat span
    pub fn new(rng: &mut impl Rng, repeat_width: f32, viewport_height: f32) -> Self {
        let mut cloud = Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            speed: 0.0,
            opacity: 0.0,
            shape: CloudShape::Rounded,
        };
        cloud.reroll(rng, viewport_height);
        cloud.x = rng.random::<f32>() * repeat_width;
        cloud
    }

    /// Move left; recycle once the right edge passes the left of the view
    pub fn update(&mut self, rng: &mut impl Rng, repeat_width: f32, viewport_height: f32) {
        self.x -= self.speed;
        if self.x + self.width < 0.0 {
            self.x = repeat_width;
            self.reroll(rng, viewport_height);
        }
    }

    fn reroll(&mut self, rng: &mut impl Rng, viewport_height: f32) {
        self.width = 40.0 + rng.random::<f32>() * 60.0;
        self.height = self.width * 0.6;
        self.y = rng.random::<f32>() * viewport_height * 0.3;
        self.speed = 0.2 + rng.random::<f32>() * 0.2;
        self.opacity = 0.6 + rng.random::<f32>() * 0.4;
        self.shape = CloudShape::sample(rng);
    }
}
