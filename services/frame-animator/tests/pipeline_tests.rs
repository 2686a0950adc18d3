//! Pipeline tests over in-memory datasets.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use frame_animator::{AnimationConfig, Pipeline, RunSummary};
use grid_processor::TerrainSurface;
use netcdf_parser::SnowDataset;
use test_utils::{create_mountain_dem, create_snow_grid, daily_times, sasp_grid};

const NX: usize = 24;
const NY: usize = 18;

fn small_config(output_dir: &Path) -> AnimationConfig {
    let mut config = AnimationConfig {
        output_dir: output_dir.to_path_buf(),
        workers: 3,
        memory_limit_gb: 1.0,
        ..Default::default()
    };
    config.figure.dpi = 20.0;
    config.figure.surface_samples = 12;
    config
}

fn run_days(config: AnimationConfig, days: usize) -> RunSummary {
    let grid = sasp_grid(NX, NY, 100.0);
    let steps = daily_times(2019, 10, 1, 22, days)
        .into_iter()
        .enumerate()
        .map(|(day, t)| (t, create_snow_grid(NX, NY, day)))
        .collect();
    let snow = SnowDataset::from_memory(grid.clone(), steps).unwrap();
    let terrain = TerrainSurface::smoothed(grid, &create_mountain_dem(NX, NY), 2.0).unwrap();

    let pipeline = Pipeline::new(config);
    let shared = pipeline.shared(snow, terrain).unwrap();
    pipeline.run_with(Arc::new(shared)).unwrap()
}

fn file_names(dir: &Path) -> BTreeSet<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect()
}

#[test]
fn test_zero_steps_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frames");
    let summary = run_days(small_config(&out), 0);

    assert!(summary.succeeded());
    assert_eq!(summary.total, 0);
    assert!(summary.written.is_empty());
    assert!(out.is_dir());
    assert!(file_names(&out).is_empty());
}

#[test]
fn test_one_step_writes_one_frame() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_days(small_config(dir.path()), 1);

    assert!(summary.succeeded());
    assert_eq!(summary.written, vec![dir.path().join("20191001.jpg")]);
    assert_eq!(file_names(dir.path()), BTreeSet::from(["20191001.jpg".to_string()]));
}

#[test]
fn test_many_steps_named_by_date() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_days(small_config(dir.path()), 5);

    assert!(summary.succeeded());
    assert_eq!(summary.total, 5);
    assert_eq!(summary.written.len(), 5);

    let expected: BTreeSet<String> = ["20191001", "20191002", "20191003", "20191004", "20191005"]
        .iter()
        .map(|d| format!("{}.jpg", d))
        .collect();
    assert_eq!(file_names(dir.path()), expected);

    for name in &expected {
        let img = image::open(dir.path().join(name)).unwrap();
        assert_eq!((img.width(), img.height()), (220, 120));
    }
}

#[test]
fn test_rerun_produces_same_file_set() {
    let dir = tempfile::tempdir().unwrap();
    run_days(small_config(dir.path()), 4);
    let first = file_names(dir.path());
    run_days(small_config(dir.path()), 4);
    let second = file_names(dir.path());

    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

#[test]
fn test_failed_frame_does_not_stop_others() {
    let dir = tempfile::tempdir().unwrap();
    // a directory in the way of the third frame
    std::fs::create_dir(dir.path().join("20191003.jpg")).unwrap();

    let summary = run_days(small_config(dir.path()), 5);

    assert!(!summary.succeeded());
    assert_eq!(summary.written.len(), 4);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].index, 2);
    assert!(summary.to_string().contains("frame 2"));
}

#[test]
fn test_single_worker() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnimationConfig {
        workers: 1,
        ..small_config(dir.path())
    };
    let summary = run_days(config, 3);
    assert_eq!(summary.workers, 1);
    assert_eq!(summary.written.len(), 3);
}
