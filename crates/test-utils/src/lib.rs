//! Shared test utilities for the nexrad-level3 workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic Level 3 product builders
//! - Color table fixtures
//! - Test data path helpers and skip macros
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_real_capture() {
///     let path = require_test_file!("KTLX_N0B_20240115_2226.l3");
///     // Test code using path...
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Download test data or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of two RGBA float colors, channel by channel.
///
/// ```ignore
/// use test_utils::assert_rgba_approx_eq;
///
/// assert_rgba_approx_eq!([1.0, 0.5, 0.25, 1.0], [1.0, 0.498, 0.247, 1.0], 0.01);
/// ```
#[macro_export]
macro_rules! assert_rgba_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: [f32; 4] = $left;
        let right: [f32; 4] = $right;
        for channel in 0..4 {
            $crate::assert_approx_eq!(left[channel], right[channel], $epsilon);
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_rgba_approx_eq_passes() {
        assert_rgba_approx_eq!([1.0, 0.5, 0.25, 1.0], [1.0, 0.498, 0.247, 1.0], 0.01);
    }
}
