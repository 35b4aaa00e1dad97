//! Statistical computations and parallel reduction operations
//!
//! This module provides the named reductions (sum, mean, min, max, ...) that
//! collapse one axis of a raw buffer, computed with parallel processing.
//!
//! # Organization
//!
//! - [`operations`]: The [`StatOperation`] table and the reduction trait
//! - [`parallel`]: Parallel kernel implementations

pub mod operations;
pub mod parallel;

// Re-export the main types and functions for convenience
pub use operations::{StatOperation, StatisticalReduction};
pub use parallel::{
    parallel_max_axis, parallel_mean_axis, parallel_min_axis, parallel_reduce_lanes, parallel_sum_axis,
};
