//! Axis-aligned hit testing
//!
//! The agent collides through a hitbox smaller than its body, so a graze on
//! the sprite edge is not a hit. Obstacles use their full rectangle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    /// Overlap test; rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Indices of the rectangles the hitbox overlaps
pub fn hits<'a, I>(hitbox: &Rect, targets: I) -> Vec<usize>
where
    I: IntoIterator<Item = &'a Rect>,
{
    targets
        .into_iter()
        .enumerate()
        .filter(|(_, r)| hitbox.intersects(r))
        .map(|(i, _)| i)
        .collect()
}
