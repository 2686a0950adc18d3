//! Helpers shared by the workspace's integration tests.
//!
//! Synthetic snow and terrain grids, grids and time axes around the SASP
//! site, scratch directories, and two macros: one skips a test when an
//! optional model file is absent and one compares floats with a tolerance.

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Path of an optional model file, or return from the test with a notice.
///
/// ```ignore
/// let topo = require_test_file!("topo.nc");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "skipping: {} not found (set {} to a directory of model output)",
                    $name,
                    $crate::TEST_DATA_ENV
                );
                return;
            }
        }
    };
}

/// Assert `|left - right| <= tolerance`, comparing as `f64`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let (left, right, tolerance) = ($left as f64, $right as f64, $tolerance as f64);
        if (left - right).abs() > tolerance {
            panic!(
                "values differ by more than {}: left = {}, right = {}",
                tolerance, left, right
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_approx_eq_within_tolerance() {
        assert_approx_eq!(3200.004_f32, 3200.0_f32, 1e-2);
        assert_approx_eq!(-0.5, -0.500_000_1, 1e-6);
    }

    #[test]
    #[should_panic(expected = "values differ")]
    fn test_approx_eq_outside_tolerance() {
        assert_approx_eq!(0.4, 0.39, 1e-3);
    }
}
