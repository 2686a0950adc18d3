//! Parallel renderer for snow depth animation frames.
//!
//! Loads a multi-file snow model time series and a terrain grid, shares both
//! with a fixed-size worker pool, and renders one two-panel JPEG per time
//! step, named by its date.
//!
//! # Example
//!
//! ```ignore
//! use frame_animator::{AnimationConfig, Pipeline};
//!
//! let summary = Pipeline::new(AnimationConfig::default()).run()?;
//! println!("{}", summary);
//! ```

pub mod config;
pub mod pipeline;
pub mod pool;
pub mod task;

pub use config::{AnimationConfig, CliOverrides, FigureConfig};
pub use pipeline::{FrameFailure, Pipeline, RunSummary};
pub use pool::{effective_workers, estimate_frame_bytes, WorkerPool};
pub use task::{FrameTask, SharedData};
