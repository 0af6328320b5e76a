//! Shared test utilities for the store-heatmap workspace.
//!
//! This crate provides:
//! - Synthetic dataset rows and CSV rendering
//! - Temporary on-disk dataset files
//! - Fixture rows taken from the production dataset's documented samples
//!
//! # Usage
//!
//! ```ignore
//! use test_utils::{fixtures, SyntheticRow, write_dataset};
//!
//! let file = write_dataset(&[fixtures::sample_row()]);
//! let cache = DataCache::load(file.path())?;
//! ```

pub mod fixtures;
pub mod generators;

pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(52.5001_f64, 52.5_f64, 0.001_f64); // passes
/// assert_approx_eq!(52.6_f64, 52.5_f64, 0.001_f64);    // fails
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
