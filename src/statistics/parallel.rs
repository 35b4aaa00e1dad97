//! Parallel computation implementations for statistical operations
//!
//! Every kernel splits the input into 1-D lanes along the reduced axis and
//! reduces the lanes in parallel with rayon. NaN values are skipped, so a lane
//! holding only NaN yields NaN (or 0 for sums and counts).

use crate::errors::{Result, ResampleError};
use ndarray::{ArrayD, ArrayView1, Axis};
use rayon::prelude::*;
use tracing::trace;

/// Reduces every lane along `axis` with `kernel`, in parallel.
///
/// # Errors
///
/// Returns an error if the axis is out of bounds.
pub fn parallel_reduce_lanes<F>(data: &ArrayD<f64>, axis: usize, kernel: F) -> Result<ArrayD<f64>>
where
    F: Fn(ArrayView1<'_, f64>) -> f64 + Sync + Send,
{
    if axis >= data.ndim() {
        return Err(ResampleError::StatisticsError(format!(
            "Axis {axis} is out of bounds for array with {} dimensions",
            data.ndim()
        )));
    }
    let mut out_shape = data.shape().to_vec();
    out_shape.remove(axis);

    let lanes: Vec<ArrayView1<'_, f64>> = data.lanes(Axis(axis)).into_iter().collect();
    trace!(
        lanes = lanes.len(),
        threads = rayon::current_num_threads(),
        "reducing lanes in parallel"
    );

    let result: Vec<f64> = lanes.par_iter().map(|lane| kernel(lane.view())).collect();
    Ok(ArrayD::from_shape_vec(out_shape, result)?)
}

fn valid<'a>(lane: ArrayView1<'a, f64>) -> impl Iterator<Item = f64> + 'a {
    lane.into_iter().copied().filter(|x| !x.is_nan())
}

#[allow(clippy::cast_precision_loss)]
fn lane_mean(lane: ArrayView1<'_, f64>) -> Option<f64> {
    let (sum, count) = valid(lane).fold((0.0_f64, 0_usize), |(s, c), x| (s + x, c + 1));
    (count > 0).then(|| sum / count as f64)
}

#[allow(clippy::cast_precision_loss)]
fn lane_var(lane: ArrayView1<'_, f64>) -> f64 {
    let Some(mean) = lane_mean(lane) else {
        return f64::NAN;
    };
    let (sq, count) = valid(lane).fold((0.0_f64, 0_usize), |(s, c), x| (s + (x - mean).powi(2), c + 1));
    sq / count as f64
}

/// Position of the first value preferred by `better` over every earlier one.
#[allow(clippy::cast_precision_loss)]
fn lane_arg(lane: ArrayView1<'_, f64>, better: fn(f64, f64) -> bool) -> f64 {
    let mut best: Option<(usize, f64)> = None;
    for (i, &x) in lane.iter().enumerate() {
        if x.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if !better(x, b) => {}
            _ => best = Some((i, x)),
        }
    }
    best.map_or(f64::NAN, |(i, _)| i as f64)
}

/// Computes sum along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_sum_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| valid(lane).sum())
}

/// Computes mean along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_mean_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| lane_mean(lane).unwrap_or(f64::NAN))
}

/// Computes minimum along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_min_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| {
        let min = valid(lane).fold(f64::INFINITY, f64::min);
        // Convert INFINITY to NaN where no valid values were found
        if min == f64::INFINITY && !valid(lane).any(|x| x == f64::INFINITY) {
            f64::NAN
        } else {
            min
        }
    })
}

/// Computes maximum along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_max_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| {
        let max = valid(lane).fold(f64::NEG_INFINITY, f64::max);
        if max == f64::NEG_INFINITY && !valid(lane).any(|x| x == f64::NEG_INFINITY) {
            f64::NAN
        } else {
            max
        }
    })
}

/// Computes product along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_prod_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| valid(lane).product())
}

/// Computes population variance along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_var_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| lane_var(lane))
}

/// Computes population standard deviation along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_std_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| lane_var(lane).sqrt())
}

/// Computes median along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_median_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| {
        let mut values: Vec<f64> = valid(lane).collect();
        if values.is_empty() {
            return f64::NAN;
        }
        values.sort_by(f64::total_cmp);
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        }
    })
}

/// Counts non-NaN values along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
#[allow(clippy::cast_precision_loss)]
pub fn parallel_count_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| valid(lane).count() as f64)
}

/// Finds the position of the minimum along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_argmin_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| lane_arg(lane, |x, best| x < best))
}

/// Finds the position of the maximum along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_argmax_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| lane_arg(lane, |x, best| x > best))
}

/// Tests whether any value along an axis is non-zero
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_any_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| f64::from(u8::from(lane.iter().any(|&x| x != 0.0))))
}

/// Tests whether every value along an axis is non-zero
///
/// # Errors
///
/// Returns an error if the result cannot be reshaped.
pub fn parallel_all_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    parallel_reduce_lanes(data, axis, |lane| f64::from(u8::from(lane.iter().all(|&x| x != 0.0))))
}
