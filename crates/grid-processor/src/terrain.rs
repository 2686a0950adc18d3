//! Smoothed terrain surface shared by every frame.

use snow_common::GridSpec;
use tracing::{debug, info};

use crate::downsample::finite_min_max;
use crate::error::{GridError, GridResult};
use crate::smooth::{gaussian_filter, DEFAULT_TRUNCATE};

/// Terrain elevation ready for the 3D panel.
#[derive(Debug, Clone)]
pub struct TerrainSurface {
    pub grid: GridSpec,
    /// Elevation in metres, row-major over `grid`.
    pub elevation: Vec<f32>,
    /// Lowest finite elevation (0 when there is none).
    pub min: f32,
    /// Highest finite elevation (0 when there is none).
    pub max: f32,
}

impl TerrainSurface {
    /// Smooth the raw elevation with a Gaussian of `sigma` grid cells.
    pub fn smoothed(grid: GridSpec, raw: &[f32], sigma: f64) -> GridResult<Self> {
        let start = std::time::Instant::now();
        let elevation = gaussian_filter(raw, grid.nx(), grid.ny(), sigma, DEFAULT_TRUNCATE)?;
        info!(
            shape = %grid.shape_string(),
            sigma,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Smoothed terrain"
        );
        Self::from_elevation(grid, elevation)
    }

    /// Wrap already-prepared elevation values.
    pub fn from_elevation(grid: GridSpec, elevation: Vec<f32>) -> GridResult<Self> {
        if elevation.len() != grid.len() {
            return Err(GridError::shape_mismatch(grid.nx(), grid.ny(), elevation.len()));
        }
        let (min, max) = finite_min_max(&elevation).unwrap_or((0.0, 0.0));
        debug!(min, max, "Terrain elevation range");
        Ok(Self {
            grid,
            elevation,
            min,
            max,
        })
    }
}
