//! Full runs from NetCDF files on disk.

use std::path::Path;

use frame_animator::{AnimationConfig, Pipeline};
use snow_common::GridSpec;
use test_utils::{create_mountain_dem, create_snow_grid, sasp_grid};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn write_coords(file: &mut netcdf::FileMut, grid: &GridSpec) -> TestResult {
    file.add_dimension("y", grid.ny())?;
    file.add_dimension("x", grid.nx())?;
    file.add_variable::<f64>("x", &["x"])?.put_values(&grid.x, ..)?;
    file.add_variable::<f64>("y", &["y"])?.put_values(&grid.y, ..)?;
    Ok(())
}

/// One model run: hourly steps from `start_hour`, counted from 2019-10-01.
fn write_run(path: &Path, grid: &GridSpec, start_hour: usize, hours: usize) -> TestResult {
    let mut file = netcdf::create(path)?;
    write_coords(&mut file, grid)?;
    file.add_dimension("time", hours)?;

    let offsets: Vec<f64> = (start_hour..start_hour + hours).map(|h| h as f64).collect();
    let mut time = file.add_variable::<f64>("time", &["time"])?;
    time.put_attribute("units", "hours since 2019-10-01 00:00:00")?;
    time.put_values(&offsets, ..)?;

    let layers: Vec<f32> = (start_hour..start_hour + hours)
        .flat_map(|h| create_snow_grid(grid.nx(), grid.ny(), h / 24))
        .collect();
    let mut var = file.add_variable::<f32>("thickness", &["time", "y", "x"])?;
    var.put_values(&layers, ..)?;
    Ok(())
}

fn write_topo(path: &Path, grid: &GridSpec) -> TestResult {
    let mut file = netcdf::create(path)?;
    write_coords(&mut file, grid)?;
    let mut var = file.add_variable::<f32>("dem", &["y", "x"])?;
    var.put_values(&create_mountain_dem(grid.nx(), grid.ny()), ..)?;
    Ok(())
}

#[test]
fn test_two_runs_render_one_frame_per_day() -> TestResult {
    let dir = tempfile::tempdir()?;
    let grid = sasp_grid(16, 12, 100.0);

    std::fs::create_dir(dir.path().join("run1"))?;
    std::fs::create_dir(dir.path().join("run2"))?;
    // two days, then two more days
    write_run(&dir.path().join("run1").join("wy2020_snow.nc"), &grid, 0, 48)?;
    write_run(&dir.path().join("run2").join("wy2020_snow.nc"), &grid, 48, 48)?;
    // not matched by the pattern
    write_run(&dir.path().join("run2").join("wy2020_em.nc"), &grid, 96, 24)?;
    write_topo(&dir.path().join("topo.nc"), &grid)?;

    let out = dir.path().join("frames");
    let mut config = AnimationConfig {
        snow_root: dir.path().to_path_buf(),
        terrain_path: dir.path().join("topo.nc"),
        output_dir: out.clone(),
        smoothing_sigma: 1.0,
        workers: 2,
        ..Default::default()
    };
    config.figure.dpi = 20.0;
    config.figure.surface_samples = 8;
    config.validate()?;

    let summary = Pipeline::new(config).run()?;
    assert!(summary.succeeded(), "{}", summary);
    assert_eq!(summary.total, 4);

    let mut names: Vec<String> = std::fs::read_dir(&out)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    names.sort();
    assert_eq!(
        names,
        vec!["20191001.jpg", "20191002.jpg", "20191003.jpg", "20191004.jpg"]
    );
    Ok(())
}

#[test]
fn test_missing_terrain_fails_run() -> TestResult {
    let dir = tempfile::tempdir()?;
    let grid = sasp_grid(8, 6, 100.0);
    std::fs::create_dir(dir.path().join("run1"))?;
    write_run(&dir.path().join("run1").join("a_snow.nc"), &grid, 0, 24)?;

    let config = AnimationConfig {
        snow_root: dir.path().to_path_buf(),
        terrain_path: dir.path().join("missing.nc"),
        output_dir: dir.path().join("frames"),
        ..Default::default()
    };
    assert!(Pipeline::new(config).run().is_err());
    Ok(())
}

#[test]
fn test_no_snow_files_fails_run() -> TestResult {
    let dir = tempfile::tempdir()?;
    let config = AnimationConfig {
        snow_root: dir.path().to_path_buf(),
        output_dir: dir.path().join("frames"),
        ..Default::default()
    };
    assert!(Pipeline::new(config).run().is_err());
    Ok(())
}
