//! Resampling a single labeled array

use super::{check_dims, check_group, ResampleBinaryOps, ResampleReductions};
use crate::array::DataArray;
use crate::coords::Coordinate;
use crate::errors::Result;
use crate::groupby::{GroupBy, GroupOutput};
use crate::ops::BinaryOp;
use crate::statistics::{StatOperation, StatisticalReduction};
use ndarray::ArrayD;
use tracing::{debug, trace};

/// A [`DataArray`] grouped along `dim` for resampling
#[derive(Debug, Clone)]
pub struct DataArrayResample {
    groupby: GroupBy<DataArray>,
    dim: String,
    resample_dim: String,
}

impl DataArrayResample {
    /// Groups `obj` along `dim` by the labels of `group`, using
    /// `resample_dim` as the proxy dimension.
    ///
    /// # Errors
    ///
    /// Returns [`ResampleError::ProxyDimensionConflict`] when the two names
    /// are equal, and any grouping error for an invalid `group`.
    ///
    /// [`ResampleError::ProxyDimensionConflict`]: crate::errors::ResampleError::ProxyDimensionConflict
    pub fn new(obj: DataArray, group: &Coordinate, dim: &str, resample_dim: &str) -> Result<Self> {
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
    pub fn groupby(&self) -> &GroupBy<DataArray> {
        &self.groupby
    }

    /// Applies `func` to each group and joins the results.
    ///
    /// `func` may return a full array or a bare buffer shaped like its input.
    /// With `shortcut`, groups reach `func` without coordinates and the
    /// grouped array's coordinates are reattached after combining.
    ///
    /// # Errors
    ///
    /// The first error from `func` aborts the call and is returned as is.
    pub fn apply<F, R>(&self, mut func: F, shortcut: bool) -> Result<DataArray>
    where
        F: FnMut(DataArray) -> Result<R>,
        R: Into<GroupOutput>,
    {
        debug!(dim = %self.dim, shortcut, "applying function over resampled groups");
        let combined = if shortcut {
            self.groupby.apply_shortcut(func)?
        } else {
            self.groupby.apply(|group| {
                let template = group.clone();
                let output: GroupOutput = func(group)?.into();
                output.into_array(&template)
            })?
        };
        self.finalize(combined)
    }

    /// Restores the input's axis order and removes the proxy dimension from a
    /// combined result.
    fn finalize(&self, combined: DataArray) -> Result<DataArray> {
        let mut combined = self.groupby.restore_dim_order(combined)?;
        if combined.has_dim(&self.resample_dim) {
            if combined.coords().contains_key(&self.dim) {
                trace!(coord = %self.dim, "dropping coordinate superseded by group keys");
                combined = combined.drop_coord(&self.dim)?;
            }
            combined = combined.rename_dim(&self.resample_dim, &self.dim)?;
        }
        Ok(combined)
    }

    /// Collapses the resampled dimension of each group with `func`.
    ///
    /// `func` receives the group buffer and the axis to reduce. The `dim`
    /// and `axis` arguments are accepted for compatibility with other reduce
    /// methods and ignored.
    pub fn reduce<F>(
        &self,
        func: F,
        dim: Option<&str>,
        axis: Option<usize>,
        shortcut: bool,
        keep_attrs: bool,
    ) -> Result<DataArray>
    where
        F: Fn(&ArrayD<f64>, usize) -> Result<ArrayD<f64>>,
    {
        if dim.is_some() || axis.is_some() {
            trace!(?dim, ?axis, target = %self.dim, "ignoring reduce target, reducing the resampled dimension");
        }
        let target = self.dim.as_str();
        self.apply(|group| group.reduce(&func, Some(target), keep_attrs), shortcut)
    }

    /// Combines each group elementwise with the entry of `other` for its key.
    pub fn binary_op(&self, other: &DataArray, op: BinaryOp) -> Result<DataArray> {
        let combined = self.groupby.binary_op(other, op)?;
        self.finalize(combined)
    }
}

impl ResampleReductions for DataArrayResample {
    type Output = DataArray;

    fn reduce_with(&self, op: StatOperation) -> Result<DataArray> {
        self.reduce(
            move |data: &ArrayD<f64>, axis: usize| data.reduce_along_axis(axis, op),
            None,
            None,
            true,
            false,
        )
    }
}

impl ResampleBinaryOps for DataArrayResample {
    type Output = DataArray;

    fn binary_op(&self, other: &DataArray, op: BinaryOp) -> Result<DataArray> {
        DataArrayResample::binary_op(self, other, op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{CoordValues, Label};
    use crate::errors::ResampleError;

    fn sample() -> DataArray {
        let data = ArrayD::from_shape_vec(vec![4], vec![1.0, 3.0, 10.0, 20.0]).unwrap();
        DataArray::new(data, &["time"])
            .unwrap()
            .with_coord("time", Coordinate::new("time", CoordValues::Int(vec![0, 1, 2, 3])))
            .unwrap()
    }

    fn keys() -> Vec<Label> {
        vec![Label::Int(0), Label::Int(0), Label::Int(1), Label::Int(1)]
    }

    #[test]
    fn equal_names_are_a_configuration_error() {
        let group = Coordinate::from_labels("time", &keys()).unwrap();
        match DataArrayResample::new(sample(), &group, "time", "time") {
            Err(ResampleError::ProxyDimensionConflict { dim, resample_dim }) => {
                assert_eq!(dim, "time");
                assert_eq!(resample_dim, "time");
            }
            other => panic!("Expected ProxyDimensionConflict, got {:?}", other),
        }
    }

    #[test]
    fn group_on_another_axis_is_rejected() {
        let data = ArrayD::from_shape_vec(vec![4, 2], (0..8).map(f64::from).collect()).unwrap();
        let array = DataArray::new(data, &["time", "x"]).unwrap();
        let across_x = Coordinate::from_labels("x", &[Label::Int(0), Label::Int(1)]).unwrap();
        match DataArrayResample::new(array, &across_x, "time", crate::resample::RESAMPLE_DIM) {
            Err(ResampleError::IncompatibleDimensions { message }) => {
                assert!(message.contains("'x'"));
                assert!(message.contains("'time'"));
            }
            other => panic!("Expected IncompatibleDimensions, got {:?}", other),
        }
    }

    #[test]
    fn reduction_renames_proxy_back() {
        let resampled = sample().resample("time", &keys()).unwrap();
        let summed = resampled.sum().unwrap();
        assert_eq!(summed.dims(), &["time".to_string()]);
        assert_eq!(summed.data().iter().copied().collect::<Vec<_>>(), vec![4.0, 30.0]);
        assert_eq!(summed.coord("time").unwrap().values(), &CoordValues::Int(vec![0, 1]));
    }

    #[test]
    fn caller_reduce_target_is_ignored() {
        let resampled = sample().resample("time", &keys()).unwrap();
        let max = |d: &ArrayD<f64>, axis: usize| d.reduce_along_axis(axis, StatOperation::Max);
        let out = resampled.reduce(max, Some("other"), Some(7), false, false).unwrap();
        assert_eq!(out.data().iter().copied().collect::<Vec<_>>(), vec![3.0, 20.0]);
    }
}
