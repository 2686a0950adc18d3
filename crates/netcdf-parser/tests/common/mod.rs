//! Helpers for writing small NetCDF fixtures in tests.

#![allow(dead_code)]

use std::path::Path;

use snow_common::GridSpec;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Write the `x`/`y` coordinate variables of a grid.
fn write_coords(file: &mut netcdf::FileMut, grid: &GridSpec) -> TestResult {
    file.add_dimension("y", grid.ny())?;
    file.add_dimension("x", grid.nx())?;
    {
        let mut x = file.add_variable::<f64>("x", &["x"])?;
        x.put_values(&grid.x, ..)?;
    }
    {
        let mut y = file.add_variable::<f64>("y", &["y"])?;
        y.put_values(&grid.y, ..)?;
    }
    Ok(())
}

/// Write a snow model file with a `(time, y, x)` `thickness` variable.
///
/// `hours` are offsets from 2019-10-01 00:00 UTC; `fill` marks no-data cells.
pub fn write_snow_file(
    path: &Path,
    grid: &GridSpec,
    hours: &[f64],
    layers: &[Vec<f32>],
    fill: Option<f32>,
) -> TestResult {
    let mut file = netcdf::create(path)?;
    write_coords(&mut file, grid)?;
    file.add_dimension("time", hours.len())?;
    {
        let mut time = file.add_variable::<f64>("time", &["time"])?;
        time.put_attribute("units", "hours since 2019-10-01 00:00:00")?;
        time.put_values(hours, ..)?;
    }
    {
        let mut thickness = file.add_variable::<f32>("thickness", &["time", "y", "x"])?;
        thickness.put_attribute("units", "m")?;
        if let Some(fill) = fill {
            thickness.put_attribute("_FillValue", fill)?;
        }
        let flat: Vec<f32> = layers.iter().flatten().copied().collect();
        thickness.put_values(&flat, ..)?;
    }
    Ok(())
}

/// Write a topography file with a `(y, x)` `dem` variable.
pub fn write_topo_file(path: &Path, grid: &GridSpec, dem: &[f32]) -> TestResult {
    let mut file = netcdf::create(path)?;
    write_coords(&mut file, grid)?;
    {
        let mut var = file.add_variable::<f32>("dem", &["y", "x"])?;
        var.put_attribute("units", "m")?;
        var.put_values(dem, ..)?;
    }
    Ok(())
}
