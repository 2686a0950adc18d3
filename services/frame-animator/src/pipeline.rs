//! Load, broadcast, fan out, wait.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, Utc};
use grid_processor::TerrainSurface;
use netcdf_parser::{discover_files, open_snow_dataset, open_terrain, SnowOptions};
use renderer::{Figure, TextRenderer};
use tracing::{error, info, info_span, warn};

use crate::config::AnimationConfig;
use crate::pool::{estimate_frame_bytes, WorkerPool};
use crate::task::{FrameTask, SharedData};

/// A frame that could not be produced.
#[derive(Debug, Clone)]
pub struct FrameFailure {
    pub index: usize,
    pub time: Option<DateTime<Utc>>,
    pub error: String,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub written: Vec<PathBuf>,
    pub failed: Vec<FrameFailure>,
    pub workers: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} of {} frames written by {} workers in {:.1}s",
            self.written.len(),
            self.total,
            self.workers,
            self.elapsed.as_secs_f64()
        )?;
        for failure in &self.failed {
            let when = failure
                .time
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "unknown time".to_string());
            writeln!(f, "  frame {} ({}) failed: {}", failure.index, when, failure.error)?;
        }
        Ok(())
    }
}

/// The frame rendering pipeline.
pub struct Pipeline {
    config: AnimationConfig,
}

impl Pipeline {
    pub fn new(config: AnimationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Open both datasets, smooth the terrain and build the figure.
    pub fn load(&self) -> anyhow::Result<SharedData> {
        let config = &self.config;
        let _span = info_span!("load").entered();

        let files = discover_files(&config.snow_root, &config.snow_pattern)?;
        info!(
            root = %config.snow_root.display(),
            pattern = %config.snow_pattern,
            files = files.len(),
            "Discovered snow files"
        );
        let snow = open_snow_dataset(
            &files,
            &SnowOptions {
                variable: config.snow_variable.clone(),
                time_of_day: config.time_of_day,
            },
        )?;

        let dem = open_terrain(&config.terrain_path, &config.terrain_variable)?;
        if !dem.grid.same_shape(snow.grid()) {
            bail!(
                "terrain grid {} does not match snow grid {}",
                dem.grid.shape_string(),
                snow.grid().shape_string()
            );
        }
        let terrain = TerrainSurface::smoothed(dem.grid, &dem.values, config.smoothing_sigma)
            .context("failed to smooth terrain")?;

        self.shared(snow, terrain)
    }

    /// Bundle loaded datasets with the figure and output settings.
    pub fn shared(
        &self,
        snow: netcdf_parser::SnowDataset,
        terrain: TerrainSurface,
    ) -> anyhow::Result<SharedData> {
        let config = &self.config;
        let style = config.figure.to_style(&config.site)?;
        let fonts = TextRenderer::load(config.font_path.as_deref());
        let figure = Figure::new(style, fonts)?;

        Ok(SharedData {
            snow,
            terrain,
            figure,
            output_dir: config.output_dir.clone(),
            jpeg_quality: config.jpeg_quality,
        })
    }

    /// Load the inputs and render every frame.
    pub fn run(&self) -> anyhow::Result<RunSummary> {
        let data = self.load()?;
        self.run_with(Arc::new(data))
    }

    /// Render one frame per time step of already loaded inputs.
    pub fn run_with(&self, data: Arc<SharedData>) -> anyhow::Result<RunSummary> {
        let start = Instant::now();
        std::fs::create_dir_all(&data.output_dir)
            .with_context(|| format!("failed to create {}", data.output_dir.display()))?;

        let (width, height) = data.figure.style().size_px();
        let frame_bytes = estimate_frame_bytes(width, height, data.snow.grid().len());
        let pool = WorkerPool::new(
            self.config.workers,
            self.config.memory_limit_bytes(),
            frame_bytes,
        )?;

        let tasks: Vec<FrameTask> = (0..data.snow.len())
            .map(|index| FrameTask::new(index, Arc::clone(&data)))
            .collect();
        let distinct: HashSet<PathBuf> = data
            .snow
            .times()
            .iter()
            .map(|t| data.frame_path(t))
            .collect();
        if distinct.len() < tasks.len() {
            warn!(
                frames = tasks.len(),
                files = distinct.len(),
                "Several time steps share a date and will overwrite each other"
            );
        }

        info!(
            frames = tasks.len(),
            workers = pool.workers(),
            output_dir = %data.output_dir.display(),
            "Rendering frames"
        );

        let results = pool.run_all(&tasks, FrameTask::render);

        let mut written = Vec::new();
        let mut failed = Vec::new();
        for (task, result) in tasks.iter().zip(results) {
            let result = result.unwrap_or_else(|panic| Err(anyhow!("render panicked: {}", panic)));
            match result {
                Ok(path) => written.push(path),
                Err(e) => {
                    let message = format!("{:#}", e);
                    error!(index = task.index, error = %message, "Frame failed");
                    failed.push(FrameFailure {
                        index: task.index,
                        time: task.time(),
                        error: message,
                    });
                }
            }
        }

        let summary = RunSummary {
            total: tasks.len(),
            written,
            failed,
            workers: pool.workers(),
            elapsed: start.elapsed(),
        };
        info!(
            total = summary.total,
            written = summary.written.len(),
            failed = summary.failed.len(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Run complete"
        );
        Ok(summary)
    }
}
