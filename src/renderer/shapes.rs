//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use crate::sim::{Cloud, CloudShape};

/// Rotate and translate local-space points into screen space
pub fn transform(points: &[Vec2], origin: Vec2, rotation: f32) -> Vec<Vec2> {
    let rot = Vec2::from_angle(rotation);
    points.iter().map(|p| origin + rot.rotate(*p)).collect()
}

/// Overlapping circles (center, radius) that make up a cloud
pub fn cloud_puffs(cloud: &Cloud) -> Vec<(Vec2, f32)> {
    let w = cloud.width;
    let h = cloud.height;
    let c = Vec2::new(cloud.x + w * 0.5, cloud.y + h * 0.5);

    let mut puffs = vec![(c, w * 0.3)];
    match cloud.shape {
        CloudShape::Rounded => {
            puffs.push((c + Vec2::new(-w * 0.2, 0.0), w * 0.25));
            puffs.push((c + Vec2::new(w * 0.2, 0.0), w * 0.25));
        }
        CloudShape::Elongated => {
            puffs.push((c + Vec2::new(-w * 0.3, 0.0), w * 0.2));
            puffs.push((c + Vec2::new(w * 0.3, 0.0), w * 0.2));
            puffs.push((c + Vec2::new(0.0, -h * 0.1), w * 0.25));
        }
        CloudShape::Clustered => {
            puffs.push((c + Vec2::new(-w * 0.25, -h * 0.1), w * 0.2));
            puffs.push((c + Vec2::new(w * 0.25, -h * 0.1), w * 0.2));
            puffs.push((c + Vec2::new(0.0, h * 0.1), w * 0.25));
        }
    }
    puffs
}

/// Star-shaped flame outline: `rays` spikes alternating between the inner
/// radius and the per-ray outer lengths
pub fn starburst(center: Vec2, inner: f32, outer: &[f32]) -> Vec<Vec2> {
    let rays = outer.len();
    if rays == 0 {
        return Vec::new();
    }
    let mut points = Vec::with_capacity(rays * 2);
    for (i, length) in outer.iter().enumerate() {
        let angle = i as f32 / rays as f32 * TAU;
        let half = angle + TAU / (rays as f32 * 2.0);
        points.push(center + Vec2::from_angle(angle) * *length);
        points.push(center + Vec2::from_angle(half) * inner);
    }
    points
}
