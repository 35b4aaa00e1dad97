//! Resampling along a labeled dimension
//!
//! Resampling is grouping whose stacked results must come back under the
//! name of the dimension that was grouped. While the grouping engine runs, the
//! group keys live on a proxy dimension ([`RESAMPLE_DIM`] by default); after
//! combining, the proxy is renamed back to the real dimension.
//!
//! # Organization
//!
//! - [`array`]: [`DataArrayResample`], with an optional shortcut path
//! - [`dataset`]: [`DatasetResample`], always full fidelity
//!
//! Both types get the named reductions through [`ResampleReductions`] and the
//! elementwise operators through [`ResampleBinaryOps`].

pub mod array;
pub mod dataset;

pub use crate::groupby::GroupOutput;
pub use array::DataArrayResample;
pub use dataset::DatasetResample;

use crate::array::DataArray;
use crate::coords::Coordinate;
use crate::errors::{Result, ResampleError};
use crate::ops::BinaryOp;
use crate::statistics::StatOperation;

/// Default name of the proxy dimension used while grouping
pub const RESAMPLE_DIM: &str = "__resample_dim__";

pub(crate) fn check_dims(dim: &str, resample_dim: &str) -> Result<()> {
    if dim == resample_dim {
        return Err(ResampleError::proxy_dimension_conflict(dim, resample_dim));
    }
    Ok(())
}

/// The group labels must run along the dimension being resampled.
pub(crate) fn check_group(group: &Coordinate, dim: &str) -> Result<()> {
    match group.dim() {
        Some(along) if along == dim => Ok(()),
        along => Err(ResampleError::IncompatibleDimensions {
            message: format!(
                "group labels run along '{}', cannot resample dimension '{dim}'",
                along.unwrap_or("<scalar>")
            ),
        }),
    }
}

/// Named reductions over the resampled dimension
///
/// Every method collapses the real dimension of each group with the
/// matching [`StatOperation`] and drops attributes.
pub trait ResampleReductions {
    type Output;

    /// Reduce each group with `op`.
    fn reduce_with(&self, op: StatOperation) -> Result<Self::Output>;

    fn sum(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::Sum)
    }

    fn mean(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::Mean)
    }

    fn min(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::Min)
    }

    fn max(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::Max)
    }

    fn prod(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::Prod)
    }

    fn std(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::Std)
    }

    fn var(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::Var)
    }

    fn median(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::Median)
    }

    fn count(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::Count)
    }

    fn argmin(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::ArgMin)
    }

    fn argmax(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::ArgMax)
    }

    fn any(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::Any)
    }

    fn all(&self) -> Result<Self::Output> {
        self.reduce_with(StatOperation::All)
    }
}

/// Elementwise operators between each group and a keyed array
///
/// `other` either lacks the resampled dimension or carries it labeled by
/// the group keys, as the result of a resample reduction does.
pub trait ResampleBinaryOps {
    type Output;

    fn binary_op(&self, other: &DataArray, op: BinaryOp) -> Result<Self::Output>;

    fn add(&self, other: &DataArray) -> Result<Self::Output> {
        self.binary_op(other, BinaryOp::Add)
    }

    fn sub(&self, other: &DataArray) -> Result<Self::Output> {
        self.binary_op(other, BinaryOp::Sub)
    }

    fn mul(&self, other: &DataArray) -> Result<Self::Output> {
        self.binary_op(other, BinaryOp::Mul)
    }

    fn div(&self, other: &DataArray) -> Result<Self::Output> {
        self.binary_op(other, BinaryOp::Div)
    }

    fn pow(&self, other: &DataArray) -> Result<Self::Output> {
        self.binary_op(other, BinaryOp::Pow)
    }
}
