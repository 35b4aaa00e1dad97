//! Core statistical operations and traits
//!
//! This module defines the fixed table of named reductions and the trait that
//! dispatches them onto the parallel kernels.

use crate::errors::{Result, ResampleError};
use ndarray::ArrayD;

/// Supported statistical operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatOperation {
    /// Sum of values
    Sum,
    /// Arithmetic mean
    Mean,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
    /// Product of values
    Prod,
    /// Population standard deviation
    Std,
    /// Population variance
    Var,
    /// Median value
    Median,
    /// Number of non-NaN values
    Count,
    /// Position of the minimum along the axis
    ArgMin,
    /// Position of the maximum along the axis
    ArgMax,
    /// 1.0 if any value is non-zero
    Any,
    /// 1.0 if every value is non-zero
    All,
}

impl StatOperation {
    /// Every named reduction, in table order
    pub const ALL: [StatOperation; 13] = [
        Self::Sum,
        Self::Mean,
        Self::Min,
        Self::Max,
        Self::Prod,
        Self::Std,
        Self::Var,
        Self::Median,
        Self::Count,
        Self::ArgMin,
        Self::ArgMax,
        Self::Any,
        Self::All,
    ];

    /// Get the string representation of the operation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
            Self::Prod => "prod",
            Self::Std => "std",
            Self::Var => "var",
            Self::Median => "median",
            Self::Count => "count",
            Self::ArgMin => "argmin",
            Self::ArgMax => "argmax",
            Self::Any => "any",
            Self::All => "all",
        }
    }

    /// Look up an operation by name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.as_str() == name)
    }
}

/// Trait for types that can perform statistical reductions along an axis
pub trait StatisticalReduction<T> {
    /// Perform a statistical reduction along the specified axis
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is out of bounds for the array.
    fn reduce_along_axis(&self, axis: usize, operation: StatOperation) -> Result<ArrayD<T>>;
}

impl StatisticalReduction<f64> for ArrayD<f64> {
    fn reduce_along_axis(&self, axis: usize, operation: StatOperation) -> Result<ArrayD<f64>> {
        if axis >= self.ndim() {
            return Err(ResampleError::StatisticsError(format!(
                "Axis {axis} is out of bounds for array with {} dimensions",
                self.ndim()
            )));
        }

        use super::parallel as kernels;
        match operation {
            StatOperation::Sum => kernels::parallel_sum_axis(self, axis),
            StatOperation::Mean => kernels::parallel_mean_axis(self, axis),
            StatOperation::Min => kernels::parallel_min_axis(self, axis),
            StatOperation::Max => kernels::parallel_max_axis(self, axis),
            StatOperation::Prod => kernels::parallel_prod_axis(self, axis),
            StatOperation::Std => kernels::parallel_std_axis(self, axis),
            StatOperation::Var => kernels::parallel_var_axis(self, axis),
            StatOperation::Median => kernels::parallel_median_axis(self, axis),
            StatOperation::Count => kernels::parallel_count_axis(self, axis),
            StatOperation::ArgMin => kernels::parallel_argmin_axis(self, axis),
            StatOperation::ArgMax => kernels::parallel_argmax_axis(self, axis),
            StatOperation::Any => kernels::parallel_any_axis(self, axis),
            StatOperation::All => kernels::parallel_all_axis(self, axis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_the_table() {
        for op in StatOperation::ALL {
            assert_eq!(StatOperation::from_name(op.as_str()), Some(op));
        }
        assert_eq!(StatOperation::from_name("mode"), None);
    }

    #[test]
    fn out_of_bounds_axis_is_rejected() {
        let data = ArrayD::<f64>::zeros(vec![2, 3]);
        match data.reduce_along_axis(2, StatOperation::Mean) {
            Err(ResampleError::StatisticsError(msg)) => assert!(msg.contains("out of bounds")),
            other => panic!("Expected StatisticsError, got {:?}", other),
        }
    }
}
