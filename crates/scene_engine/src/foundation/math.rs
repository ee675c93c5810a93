//! Math utilities and types
//!
//! Provides the small set of 2D types the runtime and its draw list need.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub origin: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    /// Create a rectangle from its corner and extent
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Create a rectangle centred on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: center - size * 0.5,
            size,
        }
    }

    /// Centre point
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Whether `point` lies inside (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x <= self.right()
            && point.y <= self.bottom()
    }

    /// Whether the two rectangles overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        self.origin.x < other.right()
            && other.origin.x < self.right()
            && self.origin.y < other.bottom()
            && other.origin.y < self.bottom()
    }
}
