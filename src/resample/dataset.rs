//! Resampling a collection of variables

use super::{check_dims, check_group, ResampleBinaryOps, ResampleReductions};
use crate::array::DataArray;
use crate::coords::Coordinate;
use crate::dataset::Dataset;
use crate::errors::Result;
use crate::groupby::GroupBy;
use crate::ops::BinaryOp;
use crate::statistics::{StatOperation, StatisticalReduction};
use ndarray::ArrayD;
use tracing::{debug, trace};

/// A [`Dataset`] grouped along `dim` for resampling
#[derive(Debug, Clone)]
pub struct DatasetResample {
    groupby: GroupBy<Dataset>,
    dim: String,
    resample_dim: String,
}

impl DatasetResample {
    /// Groups `obj` along `dim` by the labels of `group`, using
    /// `resample_dim` as the proxy dimension.
    ///
    /// Fails when the two names are equal.
    pub fn new(obj: Dataset, group: &Coordinate, dim: &str, resample_dim: &str) -> Result<Self> {
        check_dims(dim, resample_dim)?;
        check_group(group, dim)?;
        Ok(Self {
            groupby: GroupBy::new(obj, resample_dim, group)?,
            dim: dim.to_string(),
            resample_dim: resample_dim.to_string(),
        })
    }

    #[must_use]
    pub fn dim(&self) -> &str {
        &self.dim
    }

    #[must_use]
    pub fn resample_dim(&self) -> &str {
        &self.resample_dim
    }

    #[must_use]
    pub fn groupby(&self) -> &GroupBy<Dataset> {
        &self.groupby
    }

    /// Applies `func` to each group and merges the results member by member.
    pub fn apply<F>(&self, func: F) -> Result<Dataset>
    where
        F: FnMut(Dataset) -> Result<Dataset>,
    {
        debug!(dim = %self.dim, "applying function over resampled dataset groups");
        let combined = self.groupby.apply(func)?;
        self.finalize(combined)
    }

    /// Same as [`apply`](Self::apply); datasets have no shortcut path, so
    /// `shortcut` is ignored.
    pub fn apply_with_shortcut<F>(&self, func: F, shortcut: bool) -> Result<Dataset>
    where
        F: FnMut(Dataset) -> Result<Dataset>,
    {
        if shortcut {
            trace!("shortcut requested for a dataset resample, using full iteration");
        }
        self.apply(func)
    }

    // a function that keeps the grouped dimension leaves no proxy to rename
    fn finalize(&self, combined: Dataset) -> Result<Dataset> {
        if combined.has_dim(&self.resample_dim) {
            combined.rename_dim(&self.resample_dim, &self.dim)
        } else {
            Ok(combined)
        }
    }

    /// Collapses the resampled dimension of every member of each group.
    ///
    /// `dim` is accepted for compatibility with other reduce methods and
    /// ignored.
    pub fn reduce<F>(&self, func: F, dim: Option<&str>, keep_attrs: bool) -> Result<Dataset>
    where
        F: Fn(&ArrayD<f64>, usize) -> Result<ArrayD<f64>>,
    {
        if let Some(dim) = dim {
            trace!(dim, target = %self.dim, "ignoring reduce target, reducing the resampled dimension");
        }
        let target = self.dim.as_str();
        self.apply(|group| group.reduce(&func, Some(target), keep_attrs))
    }

    /// Combines every member of each group with the entry of `other` for its key.
    pub fn binary_op(&self, other: &DataArray, op: BinaryOp) -> Result<Dataset> {
        let combined = self.groupby.binary_op(other, op)?;
        self.finalize(combined)
    }
}

impl ResampleReductions for DatasetResample {
    type Output = Dataset;

    fn reduce_with(&self, op: StatOperation) -> Result<Dataset> {
        self.reduce(
            move |data: &ArrayD<f64>, axis: usize| data.reduce_along_axis(axis, op),
            None,
            false,
        )
    }
}

impl ResampleBinaryOps for DatasetResample {
    type Output = Dataset;

    fn binary_op(&self, other: &DataArray, op: BinaryOp) -> Result<Dataset> {
        DatasetResample::binary_op(self, other, op)
    }
}
