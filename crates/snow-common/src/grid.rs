//! Grid specifications for projected model output.

use crate::{BoundingBox, SnowError, SnowResult};
use serde::{Deserialize, Serialize};

/// Specification of a regular projected grid.
///
/// Built from the 1D `x` and `y` coordinate variables of a dataset. Values are
/// stored row-major with `y` as the slow axis, matching `(y, x)` NetCDF
/// variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Cell-center X coordinates (columns)
    pub x: Vec<f64>,
    /// Cell-center Y coordinates (rows)
    pub y: Vec<f64>,
}

impl GridSpec {
    /// Create a grid from its coordinate vectors.
    pub fn from_coords(x: Vec<f64>, y: Vec<f64>) -> SnowResult<Self> {
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(SnowError::InvalidGrid(
                "coordinates must be finite".to_string(),
            ));
        }
        Ok(Self { x, y })
    }

    /// Create a regular grid from an origin and spacing.
    pub fn regular(nx: usize, ny: usize, first_x: f64, first_y: f64, dx: f64, dy: f64) -> Self {
        Self {
            x: (0..nx).map(|i| first_x + i as f64 * dx).collect(),
            y: (0..ny).map(|j| first_y + j as f64 * dy).collect(),
        }
    }

    /// Number of columns.
    pub fn nx(&self) -> usize {
        self.x.len()
    }

    /// Number of rows.
    pub fn ny(&self) -> usize {
        self.y.len()
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nx() * self.ny()
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.nx() == 0 || self.ny() == 0
    }

    /// Get the 1D array index for a 2D grid position.
    pub fn flat_index(&self, col: usize, row: usize) -> usize {
        row * self.nx() + col
    }

    /// Coordinates of the cell center at `(col, row)`.
    pub fn index_to_coord(&self, col: usize, row: usize) -> Option<(f64, f64)> {
        Some((*self.x.get(col)?, *self.y.get(row)?))
    }

    /// Convert coordinates to the nearest grid index.
    ///
    /// Returns `None` for points outside the cell-edge extent of the grid.
    pub fn coord_to_index(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        Some((nearest_index(&self.x, x)?, nearest_index(&self.y, y)?))
    }

    /// Spacing between adjacent columns (signed), 1.0 for single-column grids.
    pub fn dx(&self) -> f64 {
        spacing(&self.x)
    }

    /// Spacing between adjacent rows (signed), 1.0 for single-row grids.
    pub fn dy(&self) -> f64 {
        spacing(&self.y)
    }

    /// Cell-edge extent of the grid.
    pub fn bbox(&self) -> BoundingBox {
        let (min_x, max_x) = edge_range(&self.x);
        let (min_y, max_y) = edge_range(&self.y);
        BoundingBox::new(min_x, min_y, max_x, max_y)
    }

    /// Whether another grid has the same number of rows and columns.
    pub fn same_shape(&self, other: &GridSpec) -> bool {
        self.nx() == other.nx() && self.ny() == other.ny()
    }

    /// Human-readable `ny x nx` shape, used in error messages.
    pub fn shape_string(&self) -> String {
        format!("{}x{}", self.ny(), self.nx())
    }

    /// Validate that a flat data buffer matches this grid.
    pub fn check_len(&self, len: usize) -> SnowResult<()> {
        if len != self.len() {
            return Err(SnowError::shape_mismatch(
                format!("{} values", self.len()),
                format!("{} values", len),
            ));
        }
        Ok(())
    }
}

fn spacing(coords: &[f64]) -> f64 {
    if coords.len() > 1 {
        coords[1] - coords[0]
    } else {
        1.0
    }
}

fn edge_range(coords: &[f64]) -> (f64, f64) {
    if coords.is_empty() {
        return (0.0, 0.0);
    }
    let half = spacing(coords).abs() / 2.0;
    let (lo, hi) = coords
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    (lo - half, hi + half)
}

fn nearest_index(coords: &[f64], value: f64) -> Option<usize> {
    let first = *coords.first()?;
    let step = spacing(coords);
    let idx = ((value - first) / step).round();
    if !idx.is_finite() || idx < 0.0 || idx >= coords.len() as f64 {
        return None;
    }
    Some(idx as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_rows_lookup() {
        // UTM grids usually store y from north to south
        let grid = GridSpec::regular(4, 3, 100.0, 500.0, 50.0, -50.0);
        assert_eq!(grid.coord_to_index(100.0, 500.0), Some((0, 0)));
        assert_eq!(grid.coord_to_index(260.0, 410.0), Some((3, 2)));
        assert_eq!(grid.coord_to_index(260.0, 380.0), None);
    }

    #[test]
    fn test_single_cell_grid() {
        let grid = GridSpec::regular(1, 1, 10.0, 20.0, 30.0, 30.0);
        assert_eq!(grid.coord_to_index(10.2, 19.8), Some((0, 0)));
        assert_eq!(grid.len(), 1);
    }
}
