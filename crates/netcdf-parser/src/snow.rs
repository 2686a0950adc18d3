//! Multi-file snow model datasets.
//!
//! Each model run writes a NetCDF file with a `(time, y, x)` snow variable
//! (`thickness` for iSnobal output). Opening a dataset reads the time and
//! grid coordinates of every file, keeps the time steps at the requested
//! time of day, and concatenates them along time. Slices are read on demand
//! with [`SnowDataset::thickness`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use snow_common::{select_time_of_day, CfTimeUnits, GridSpec};
use tracing::{debug, info, warn};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native;

/// Options for opening a snow dataset.
#[derive(Debug, Clone)]
pub struct SnowOptions {
    /// Name of the `(time, y, x)` variable to animate
    pub variable: String,
    /// Keep only time steps at `hour:00:00`; `None` keeps every step
    pub time_of_day: Option<u32>,
}

impl Default for SnowOptions {
    fn default() -> Self {
        Self {
            variable: "thickness".to_string(),
            time_of_day: Some(22),
        }
    }
}

/// Where the values of one time step live.
#[derive(Debug, Clone)]
enum StepSource {
    /// Slice `index` along `time` of a file on disk
    NetCdf { path: PathBuf, index: usize },
    /// Values already in memory
    Memory(Arc<[f32]>),
}

#[derive(Debug, Clone)]
struct SnowStep {
    time: DateTime<Utc>,
    source: StepSource,
}

/// A time series of snow grids sharing one projected grid.
///
/// The dataset is immutable once opened and cheap to share across threads
/// behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SnowDataset {
    variable: String,
    grid: GridSpec,
    steps: Vec<SnowStep>,
}

impl SnowDataset {
    /// Build a dataset from grids already in memory.
    ///
    /// Steps are sorted by time. Every grid must have `grid.len()` values.
    pub fn from_memory(
        grid: GridSpec,
        steps: Vec<(DateTime<Utc>, Vec<f32>)>,
    ) -> NetCdfResult<Self> {
        let mut converted = Vec::with_capacity(steps.len());
        for (time, values) in steps {
            grid.check_len(values.len())?;
            converted.push(SnowStep {
                time,
                source: StepSource::Memory(values.into()),
            });
        }
        converted.sort_by_key(|s| s.time);

        Ok(Self {
            variable: "thickness".to_string(),
            grid,
            steps: converted,
        })
    }

    /// Name of the animated variable.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// The grid shared by every time step.
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the dataset has no time steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Timestamp of time step `index`.
    pub fn time(&self, index: usize) -> Option<DateTime<Utc>> {
        self.steps.get(index).map(|s| s.time)
    }

    /// All timestamps, in order.
    pub fn times(&self) -> Vec<DateTime<Utc>> {
        self.steps.iter().map(|s| s.time).collect()
    }

    /// Read the 2D values of time step `index` (row-major, `y` slow).
    pub fn thickness(&self, index: usize) -> NetCdfResult<Vec<f32>> {
        let step = self.steps.get(index).ok_or(NetCdfError::IndexOutOfRange {
            index,
            len: self.steps.len(),
        })?;

        match &step.source {
            StepSource::Memory(values) => Ok(values.to_vec()),
            StepSource::NetCdf { path, index } => {
                read_slice(path, &self.variable, *index, &self.grid)
            }
        }
    }
}

/// Open a set of snow model files as one dataset concatenated along time.
pub fn open_snow_dataset(files: &[PathBuf], options: &SnowOptions) -> NetCdfResult<SnowDataset> {
    if files.is_empty() {
        return Err(NetCdfError::missing("no snow dataset files to open"));
    }

    let mut grid: Option<GridSpec> = None;
    let mut steps = Vec::new();
    let mut total_steps = 0usize;

    for path in files {
        let (file_grid, times) = read_file_index(path, &options.variable)?;

        match &grid {
            None => grid = Some(file_grid),
            Some(existing) if existing.same_shape(&file_grid) => {}
            Some(existing) => {
                return Err(NetCdfError::GridMismatch(format!(
                    "{} has shape {}, expected {}",
                    path.display(),
                    file_grid.shape_string(),
                    existing.shape_string()
                )));
            }
        }

        total_steps += times.len();
        let selected: Vec<usize> = match options.time_of_day {
            Some(hour) => select_time_of_day(&times, hour),
            None => (0..times.len()).collect(),
        };
        debug!(
            path = %path.display(),
            steps = times.len(),
            selected = selected.len(),
            "Indexed snow file"
        );

        steps.extend(selected.into_iter().map(|index| SnowStep {
            time: times[index],
            source: StepSource::NetCdf {
                path: path.clone(),
                index,
            },
        }));
    }

    // Stable sort keeps the first file's copy of a repeated timestamp
    steps.sort_by_key(|s| s.time);
    let before = steps.len();
    steps.dedup_by_key(|s| s.time);
    if steps.len() != before {
        warn!(
            duplicates = before - steps.len(),
            "Dropped duplicate time steps across files"
        );
    }

    let grid = grid.ok_or_else(|| NetCdfError::missing("grid coordinates"))?;
    info!(
        files = files.len(),
        total_steps,
        selected_steps = steps.len(),
        shape = %grid.shape_string(),
        "Opened snow dataset"
    );

    Ok(SnowDataset {
        variable: options.variable.clone(),
        grid,
        steps,
    })
}

/// Read the grid and decoded timestamps of one file.
fn read_file_index(path: &Path, variable: &str) -> NetCdfResult<(GridSpec, Vec<DateTime<Utc>>)> {
    let file = native::open_file(path)?;

    let var = file
        .variable(variable)
        .ok_or_else(|| {
            NetCdfError::missing(format!("{} variable in {}", variable, path.display()))
        })?;
    let dims = native::dimension_names(&var);
    if dims.len() != 3 || dims[0] != "time" {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} in {} has dimensions {:?}, expected (time, y, x)",
            variable,
            path.display(),
            dims
        )));
    }

    let grid = native::read_grid(&file, path)?;

    let time_var = file
        .variable("time")
        .ok_or_else(|| NetCdfError::missing(format!("time coordinate in {}", path.display())))?;
    let units = native::get_string_attr(&time_var, "units")
        .ok_or_else(|| NetCdfError::missing(format!("time units in {}", path.display())))?;
    let units = CfTimeUnits::parse(&units)?;

    let raw: Vec<f64> = time_var
        .get_values::<f64, _>(..)
        .map_err(|e| NetCdfError::library(path, e))?;
    let times = raw
        .into_iter()
        .map(|v| units.decode(v))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((grid, times))
}

/// Read one `(y, x)` slice of a `(time, y, x)` variable.
fn read_slice(
    path: &Path,
    variable: &str,
    index: usize,
    grid: &GridSpec,
) -> NetCdfResult<Vec<f32>> {
    let file = native::open_file(path)?;
    let var = file
        .variable(variable)
        .ok_or_else(|| {
            NetCdfError::missing(format!("{} variable in {}", variable, path.display()))
        })?;

    let mut values: Vec<f32> = var
        .get_values::<f32, _>((index, .., ..))
        .map_err(|e| NetCdfError::library(path, e))?;
    native::unpack_values(&var, &mut values);

    grid.check_len(values.len())?;
    Ok(values)
}
