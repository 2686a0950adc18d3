//! Terrain elevation loading.

use std::path::Path;

use snow_common::GridSpec;
use tracing::info;

use crate::error::{NetCdfError, NetCdfResult};
use crate::native;

/// A 2D elevation grid as stored on disk.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    pub grid: GridSpec,
    /// Elevation in meters, row-major with `y` slow; fill values are NaN
    pub values: Vec<f32>,
}

/// Open the `(y, x)` elevation variable of a topography file.
pub fn open_terrain(path: &Path, variable: &str) -> NetCdfResult<ElevationGrid> {
    let file = native::open_file(path)?;
    let grid = native::read_grid(&file, path)?;

    let var = file
        .variable(variable)
        .ok_or_else(|| {
            NetCdfError::missing(format!("{} variable in {}", variable, path.display()))
        })?;
    let dims = native::dimension_names(&var);
    if dims.len() != 2 {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} in {} has dimensions {:?}, expected (y, x)",
            variable,
            path.display(),
            dims
        )));
    }

    let mut values: Vec<f32> = var
        .get_values::<f32, _>(..)
        .map_err(|e| NetCdfError::library(path, e))?;
    native::unpack_values(&var, &mut values);
    grid.check_len(values.len())?;

    info!(path = %path.display(), shape = %grid.shape_string(), "Opened terrain");
    Ok(ElevationGrid { grid, values })
}
