//! Grid operations used to prepare data for the animation frames.
//!
//! - **Smoothing**: separable Gaussian filter with mirror (`reflect`) edges,
//!   applied to terrain purely so the 3D surface reads well
//! - **Sampling**: row/column stride selection that bounds how many quads a
//!   surface is drawn with
//! - **Terrain**: the smoothed elevation surface shared by every frame
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::TerrainSurface;
//!
//! let terrain = TerrainSurface::smoothed(grid, &raw_dem, 10.0)?;
//! let rows = grid_processor::stride_indices(terrain.grid.ny(), 600);
//! ```

pub mod downsample;
pub mod error;
pub mod smooth;
pub mod terrain;

pub use downsample::{finite_min_max, sample_grid, stride_indices};
pub use error::{GridError, GridResult};
pub use smooth::{gaussian_filter, gaussian_kernel, DEFAULT_TRUNCATE};
pub use terrain::TerrainSurface;
