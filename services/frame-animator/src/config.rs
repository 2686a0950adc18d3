//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;
use renderer::surface::LightSource;
use renderer::{ColorStop, Colormap, FigureStyle, Normalize, DEFAULT_JPEG_QUALITY};
use serde::{Deserialize, Serialize};
use snow_common::Site;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Pipeline configuration, loaded from YAML.
///
/// Every field is optional; missing fields take the values of the reference
/// run (six workers with a 32 GB budget, 22:00 snapshots, terrain smoothed
/// with sigma 10, 11x6 inch figures at 300 dpi).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Directory the snow file pattern is resolved against
    pub snow_root: PathBuf,
    /// Relative glob for the snow model files
    pub snow_pattern: String,
    pub snow_variable: String,
    /// Hour of day to animate; `None` renders every time step
    pub time_of_day: Option<u32>,
    pub terrain_path: PathBuf,
    pub terrain_variable: String,
    /// Gaussian sigma in grid cells applied to the terrain
    pub smoothing_sigma: f64,
    pub output_dir: PathBuf,
    pub workers: usize,
    pub memory_limit_gb: f64,
    pub jpeg_quality: u8,
    /// TrueType font for labels; system fonts are tried when unset
    pub font_path: Option<PathBuf>,
    pub figure: FigureConfig,
    pub site: Site,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            snow_root: PathBuf::from("."),
            snow_pattern: "run*/*snow.nc".to_string(),
            snow_variable: "thickness".to_string(),
            time_of_day: Some(22),
            terrain_path: PathBuf::from("topo.nc"),
            terrain_variable: "dem".to_string(),
            smoothing_sigma: 10.0,
            output_dir: PathBuf::from("."),
            workers: 6,
            memory_limit_gb: 32.0,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            font_path: None,
            figure: FigureConfig::default(),
            site: Site::sasp(),
        }
    }
}

/// Figure appearance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width_in: f32,
    pub height_in: f32,
    pub dpi: f32,
    /// Built-in colormap name, used unless `color_stops` is given
    pub colormap: String,
    pub color_stops: Option<Vec<ColorStop>>,
    pub map_range: (f32, f32),
    pub surface_range: (f32, f32),
    pub colorbar_label: String,
    pub view_elevation: f64,
    pub surface_samples: usize,
    pub light_azimuth: f64,
    pub light_altitude: f64,
    pub box_aspect: [f64; 3],
}

impl Default for FigureConfig {
    fn default() -> Self {
        let style = FigureStyle::default();
        Self {
            width_in: style.width_in,
            height_in: style.height_in,
            dpi: style.dpi,
            colormap: "Blues_r".to_string(),
            color_stops: None,
            map_range: (style.map_norm.vmin, style.map_norm.vmax),
            surface_range: (style.surface_norm.vmin, style.surface_norm.vmax),
            colorbar_label: style.colorbar_label,
            view_elevation: style.view_elevation,
            surface_samples: style.surface_samples,
            light_azimuth: style.light.azimuth_deg,
            light_altitude: style.light.altitude_deg,
            box_aspect: style.box_aspect,
        }
    }
}

impl FigureConfig {
    fn colormap(&self) -> anyhow::Result<Colormap> {
        if let Some(stops) = &self.color_stops {
            return Colormap::from_stops(stops).context("invalid color_stops");
        }
        match Colormap::named(&self.colormap) {
            Some(cmap) => Ok(cmap),
            None => bail!("unknown colormap '{}'", self.colormap),
        }
    }

    /// Build the renderer style for `site`.
    pub fn to_style(&self, site: &Site) -> anyhow::Result<FigureStyle> {
        let colormap = self.colormap()?;
        Ok(FigureStyle {
            width_in: self.width_in,
            height_in: self.height_in,
            dpi: self.dpi,
            map_colormap: colormap.clone(),
            map_norm: Normalize::new(self.map_range.0, self.map_range.1),
            surface_colormap: colormap,
            surface_norm: Normalize::new(self.surface_range.0, self.surface_range.1),
            colorbar_label: self.colorbar_label.clone(),
            view_elevation: self.view_elevation,
            light: LightSource {
                azimuth_deg: self.light_azimuth,
                altitude_deg: self.light_altitude,
            },
            surface_samples: self.surface_samples,
            box_aspect: self.box_aspect,
            site: site.clone(),
        })
    }
}

impl AnimationConfig {
    /// Load configuration from YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Expand `~` and environment variables in every path.
    pub fn expand_paths(&mut self) -> anyhow::Result<()> {
        self.snow_root = expand_path(&self.snow_root)?;
        self.terrain_path = expand_path(&self.terrain_path)?;
        self.output_dir = expand_path(&self.output_dir)?;
        if let Some(font) = &self.font_path {
            self.font_path = Some(expand_path(font)?);
        }
        Ok(())
    }

    /// Memory budget in bytes.
    pub fn memory_limit_bytes(&self) -> u64 {
        (self.memory_limit_gb * GIB) as u64
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workers == 0 {
            bail!("workers must be > 0");
        }
        if !self.memory_limit_gb.is_finite() || self.memory_limit_gb <= 0.0 {
            bail!("memory_limit_gb must be > 0");
        }
        if self.snow_pattern.trim().is_empty() {
            bail!("snow_pattern must not be empty");
        }
        if let Some(hour) = self.time_of_day {
            if hour > 23 {
                bail!("time_of_day must be 0-23, got {}", hour);
            }
        }
        if !self.smoothing_sigma.is_finite() || self.smoothing_sigma < 0.0 {
            bail!("smoothing_sigma must be >= 0");
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            bail!("jpeg_quality must be 1-100, got {}", self.jpeg_quality);
        }
        self.figure.to_style(&self.site)?.validate()?;
        Ok(())
    }

    /// Apply command-line overrides on top of file values.
    pub fn apply(&mut self, overrides: &CliOverrides) {
        if let Some(v) = &overrides.snow_root {
            self.snow_root = v.clone();
        }
        if let Some(v) = &overrides.snow_pattern {
            self.snow_pattern = v.clone();
        }
        if let Some(v) = &overrides.terrain {
            self.terrain_path = v.clone();
        }
        if let Some(v) = &overrides.output_dir {
            self.output_dir = v.clone();
        }
        if let Some(v) = overrides.workers {
            self.workers = v;
        }
        if let Some(v) = overrides.memory_limit_gb {
            self.memory_limit_gb = v;
        }
        if let Some(v) = overrides.hour {
            self.time_of_day = Some(v);
        }
        if overrides.all_times {
            self.time_of_day = None;
        }
        if let Some(v) = overrides.sigma {
            self.smoothing_sigma = v;
        }
        if let Some(v) = overrides.dpi {
            self.figure.dpi = v;
        }
        if let Some(v) = overrides.jpeg_quality {
            self.jpeg_quality = v;
        }
        if let Some(v) = &overrides.font {
            self.font_path = Some(v.clone());
        }
    }
}

/// Command-line settings that take precedence over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct CliOverrides {
    /// Directory containing the model run folders
    #[arg(long, env = "SNOW_ROOT")]
    pub snow_root: Option<PathBuf>,

    /// Glob for snow files, relative to the root
    #[arg(long)]
    pub snow_pattern: Option<String>,

    /// Terrain NetCDF file
    #[arg(long, env = "SNOW_TERRAIN")]
    pub terrain: Option<PathBuf>,

    /// Directory frames are written to
    #[arg(short, long, env = "SNOW_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of parallel render workers
    #[arg(short, long, env = "SNOW_WORKERS")]
    pub workers: Option<usize>,

    /// Memory budget in GB shared by the workers
    #[arg(long, env = "SNOW_MEMORY_LIMIT_GB")]
    pub memory_limit_gb: Option<f64>,

    /// Hour of day to animate
    #[arg(long, conflicts_with = "all_times")]
    pub hour: Option<u32>,

    /// Render every time step instead of one per day
    #[arg(long)]
    pub all_times: bool,

    /// Terrain smoothing sigma in grid cells
    #[arg(long)]
    pub sigma: Option<f64>,

    /// Output resolution
    #[arg(long)]
    pub dpi: Option<f32>,

    /// JPEG quality (1-100)
    #[arg(long)]
    pub jpeg_quality: Option<u8>,

    /// TrueType font for labels
    #[arg(long, env = "SNOW_FONT")]
    pub font: Option<PathBuf>,
}

fn expand_path(path: &Path) -> anyhow::Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("failed to expand path {}", raw))?;
    Ok(PathBuf::from(expanded.into_owned()))
}
