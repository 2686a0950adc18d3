//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A projected bounding box.
///
/// Coordinates are in the dataset's projected units (meters for UTM grids).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point falls inside the box (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Grow the box so that it includes the given point.
    pub fn expand_to_include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Map a point to fractional position inside the box, (0, 0) at min corner.
    pub fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        let w = if self.width().abs() < f64::EPSILON { 1.0 } else { self.width() };
        let h = if self.height().abs() < f64::EPSILON { 1.0 } else { self.height() };
        ((x - self.min_x) / w, (y - self.min_y) / h)
    }
}
