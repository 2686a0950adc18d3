//! NetCDF loaders for snow model output and terrain.
//!
//! This crate reads the two inputs of the animation pipeline:
//!
//! - the snow model time series, spread across many files (one per model run
//!   directory) and lazily concatenated along `time`
//! - a single terrain file holding a 2D elevation variable
//!
//! # Implementation Notes
//!
//! Files are read with the `netcdf` crate (libnetcdf/HDF5). Opening a
//! snow dataset only reads coordinates and time; thickness slices are read
//! on demand so the dataset can be shared by many render workers without
//! holding every time step in memory.

pub mod discover;
pub mod error;
pub mod native;
pub mod snow;
pub mod terrain;

pub use discover::{discover_files, wildcard_match};
pub use error::{NetCdfError, NetCdfResult};
pub use native::silence_hdf5_errors;
pub use snow::{open_snow_dataset, SnowDataset, SnowOptions};
pub use terrain::{open_terrain, ElevationGrid};
