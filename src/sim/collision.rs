//! Collision detection for axis-aligned rectangles
//!
//! Everything on the road is a box: the vehicle, the obstacles, the road itself.
//! Edges that merely touch do not count as overlapping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, Vehicle};

/// Axis-aligned rectangle in canvas pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Bottom-right corner
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test on both axes
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }
}

/// Index of the first obstacle overlapping the vehicle, if any
pub fn find_collision(vehicle: &Vehicle, obstacles: &[Obstacle]) -> Option<usize> {
    let car = vehicle.rect();
    obstacles.iter().position(|o| car.overlaps(&o.rect()))
}
