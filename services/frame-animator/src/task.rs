//! Per-frame render task.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use grid_processor::TerrainSurface;
use netcdf_parser::SnowDataset;
use renderer::{write_jpeg, Figure, FrameData};
use snow_common::frame_stem;
use tracing::debug;

/// Read-only inputs shared by every task.
pub struct SharedData {
    pub snow: SnowDataset,
    pub terrain: TerrainSurface,
    pub figure: Figure,
    pub output_dir: PathBuf,
    pub jpeg_quality: u8,
}

impl SharedData {
    /// Output file for a time step: `<output_dir>/<YYYYMMDD>.jpg`.
    pub fn frame_path(&self, time: &DateTime<Utc>) -> PathBuf {
        self.output_dir.join(format!("{}.jpg", frame_stem(time)))
    }
}

/// Renders one time step to a JPEG file.
pub struct FrameTask {
    pub index: usize,
    data: Arc<SharedData>,
}

impl FrameTask {
    pub fn new(index: usize, data: Arc<SharedData>) -> Self {
        Self { index, data }
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.data.snow.time(self.index)
    }

    /// Draw the frame and write it, returning the written path.
    pub fn render(&self) -> anyhow::Result<PathBuf> {
        let data = &self.data;
        let time = data
            .snow
            .time(self.index)
            .with_context(|| format!("time step {} out of range", self.index))?;
        let thickness = data
            .snow
            .thickness(self.index)
            .with_context(|| format!("failed to read {} at {}", data.snow.variable(), time))?;

        let image = data.figure.render(&FrameData {
            index: self.index,
            time,
            grid: data.snow.grid(),
            thickness: &thickness,
            terrain: &data.terrain,
        })?;

        let path = data.frame_path(&time);
        write_jpeg(&path, &image, data.jpeg_quality)
            .with_context(|| format!("failed to write {}", path.display()))?;

        debug!(index = self.index, path = %path.display(), "Frame written");
        Ok(path)
    }
}
