//! Common types and utilities shared across the snow animation crates.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod site;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{SnowError, SnowResult};
pub use grid::GridSpec;
pub use site::Site;
pub use time::{frame_stem, select_time_of_day, CfTimeUnits, TimeUnit};
