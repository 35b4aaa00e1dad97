//! Raw labeled buffers
//!
//! A [`Variable`] is an n-dimensional `f64` buffer whose axes carry dimension
//! names, plus free-form attributes. It has no coordinates; those live on
//! [`DataArray`](crate::array::DataArray) and [`Dataset`](crate::dataset::Dataset).
//! The shortcut grouping path works on variables directly.

use crate::errors::{Result, ResampleError};
use crate::ops::BinaryOp;
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn, Zip};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Attribute metadata, keyed by attribute name
pub type Attrs = BTreeMap<String, JsonValue>;

/// An n-dimensional buffer with named axes
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    dims: Vec<String>,
    data: ArrayD<f64>,
    attrs: Attrs,
}

impl Variable {
    /// Create a variable; `dims` must name every axis of `data` exactly once.
    pub fn new<S: AsRef<str>>(dims: &[S], data: ArrayD<f64>) -> Result<Self> {
        let dims: Vec<String> = dims.iter().map(|d| d.as_ref().to_string()).collect();
        if dims.len() != data.ndim() {
            return Err(ResampleError::ShapeMismatch {
                message: format!(
                    "{} dimension names given for data with {} axes",
                    dims.len(),
                    data.ndim()
                ),
            });
        }
        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(ResampleError::DuplicateName { name: dim.clone() });
            }
        }
        Ok(Self {
            dims,
            data,
            attrs: Attrs::new(),
        })
    }

    /// A zero-dimensional variable holding one value
    #[must_use]
    pub fn scalar(value: f64) -> Self {
        Self {
            dims: Vec::new(),
            data: ArrayD::from_elem(IxDyn(&[]), value),
            attrs: Attrs::new(),
        }
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    #[must_use]
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    #[must_use]
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    #[must_use]
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attrs {
        &mut self.attrs
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    #[must_use]
    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    /// Axis index of `dim`
    #[must_use]
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Length of `dim`
    #[must_use]
    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        self.axis_of(dim).map(|axis| self.data.len_of(Axis(axis)))
    }

    /// Replaces the buffer, keeping dimension names and attributes.
    pub fn with_data(&self, data: ArrayD<f64>) -> Result<Self> {
        if data.shape() != self.shape() {
            return Err(ResampleError::ShapeMismatch {
                message: format!("expected shape {:?}, got {:?}", self.shape(), data.shape()),
            });
        }
        Ok(Self {
            dims: self.dims.clone(),
            data,
            attrs: self.attrs.clone(),
        })
    }

    fn require_axis(&self, dim: &str) -> Result<usize> {
        self.axis_of(dim).ok_or_else(|| ResampleError::DimensionNotFound {
            var: "<variable>".to_string(),
            dim: dim.to_string(),
        })
    }

    /// Takes `positions` along `dim`, in that order.
    pub fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self> {
        let axis = self.require_axis(dim)?;
        let len = self.data.len_of(Axis(axis));
        if let Some(&bad) = positions.iter().find(|&&p| p >= len) {
            return Err(ResampleError::ShapeMismatch {
                message: format!("position {bad} is out of bounds for dimension '{dim}' of length {len}"),
            });
        }
        Ok(Self {
            dims: self.dims.clone(),
            data: self.data.select(Axis(axis), positions),
            attrs: self.attrs.clone(),
        })
    }

    /// Takes a single position along `dim`, removing the dimension.
    pub fn isel_point(&self, dim: &str, index: usize) -> Result<Self> {
        let axis = self.require_axis(dim)?;
        let len = self.data.len_of(Axis(axis));
        if index >= len {
            return Err(ResampleError::ShapeMismatch {
                message: format!("index {index} is out of bounds for dimension '{dim}' of length {len}"),
            });
        }
        let mut dims = self.dims.clone();
        dims.remove(axis);
        Ok(Self {
            dims,
            data: self.data.index_axis(Axis(axis), index).to_owned(),
            attrs: self.attrs.clone(),
        })
    }

    /// Renames the dimension `from` to `to`.
    pub fn rename_dim(mut self, from: &str, to: &str) -> Result<Self> {
        let axis = self.require_axis(from)?;
        if from != to && self.has_dim(to) {
            return Err(ResampleError::DuplicateName { name: to.to_string() });
        }
        self.dims[axis] = to.to_string();
        Ok(self)
    }

    /// Reorders the axes to follow `order`, which must name every dimension once.
    pub fn transpose<S: AsRef<str>>(&self, order: &[S]) -> Result<Self> {
        let perm = order
            .iter()
            .map(|d| self.require_axis(d.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let mut seen = perm.clone();
        seen.sort_unstable();
        seen.dedup();
        if perm.len() != self.ndim() || seen.len() != perm.len() {
            return Err(ResampleError::IncompatibleDimensions {
                message: format!(
                    "cannot transpose dimensions {:?} to {:?}",
                    self.dims,
                    order.iter().map(AsRef::as_ref).collect::<Vec<&str>>()
                ),
            });
        }
        Ok(Self {
            dims: perm.iter().map(|&axis| self.dims[axis].clone()).collect(),
            data: self
                .data
                .view()
                .permuted_axes(IxDyn(&perm))
                .as_standard_layout()
                .into_owned(),
            attrs: self.attrs.clone(),
        })
    }

    /// Collapses `dim` with `func`, or every axis when `dim` is `None`.
    ///
    /// Attributes are copied to the result only when `keep_attrs` is set.
    pub fn reduce<F>(&self, func: &F, dim: Option<&str>, keep_attrs: bool) -> Result<Self>
    where
        F: Fn(&ArrayD<f64>, usize) -> Result<ArrayD<f64>> + ?Sized,
    {
        let (dims, data) = match dim {
            Some(dim) => {
                let axis = self.require_axis(dim)?;
                let mut dims = self.dims.clone();
                dims.remove(axis);
                (dims, func(&self.data, axis)?)
            }
            None => {
                let flat = ArrayD::from_shape_vec(IxDyn(&[self.data.len()]), self.data.iter().copied().collect())?;
                (Vec::new(), func(&flat, 0)?)
            }
        };

        let expected: Vec<usize> = match dim {
            Some(dim) => self
                .dims
                .iter()
                .zip(self.shape())
                .filter(|(d, _)| d.as_str() != dim)
                .map(|(_, &len)| len)
                .collect(),
            None => Vec::new(),
        };
        if data.shape() != expected.as_slice() {
            return Err(ResampleError::ShapeMismatch {
                message: format!(
                    "reduction returned shape {:?}, expected {:?}",
                    data.shape(),
                    expected
                ),
            });
        }

        let attrs = if keep_attrs { self.attrs.clone() } else { Attrs::new() };
        Ok(Self { dims, data, attrs })
    }

    /// Concatenates variables along their shared dimension `dim`.
    pub fn concat(items: &[Variable], dim: &str) -> Result<Self> {
        let first = items.first().ok_or_else(|| ResampleError::Generic(
            "cannot concatenate an empty list of variables".to_string(),
        ))?;
        let axis = first.require_axis(dim)?;
        if let Some(other) = items.iter().find(|v| v.dims != first.dims) {
            return Err(ResampleError::IncompatibleDimensions {
                message: format!(
                    "cannot concatenate variables with dimensions {:?} and {:?}",
                    first.dims, other.dims
                ),
            });
        }
        let views: Vec<ArrayViewD<'_, f64>> = items.iter().map(|v| v.data.view()).collect();
        Ok(Self {
            dims: first.dims.clone(),
            data: ndarray::concatenate(Axis(axis), &views)?,
            attrs: first.attrs.clone(),
        })
    }

    /// Stacks variables along a new leading dimension `new_dim`.
    pub fn stack(items: &[Variable], new_dim: &str) -> Result<Self> {
        let first = items.first().ok_or_else(|| ResampleError::Generic(
            "cannot stack an empty list of variables".to_string(),
        ))?;
        if first.has_dim(new_dim) {
            return Err(ResampleError::DuplicateName {
                name: new_dim.to_string(),
            });
        }
        if let Some(other) = items.iter().find(|v| v.dims != first.dims) {
            return Err(ResampleError::IncompatibleDimensions {
                message: format!(
                    "cannot stack variables with dimensions {:?} and {:?}",
                    first.dims, other.dims
                ),
            });
        }
        let views: Vec<ArrayViewD<'_, f64>> = items.iter().map(|v| v.data.view()).collect();
        let mut dims = Vec::with_capacity(first.dims.len() + 1);
        dims.push(new_dim.to_string());
        dims.extend(first.dims.iter().cloned());
        Ok(Self {
            dims,
            data: ndarray::stack(Axis(0), &views)?,
            attrs: first.attrs.clone(),
        })
    }

    /// Combines elementwise with `other`, broadcasting it over `self`.
    ///
    /// Every dimension of `other` must be a dimension of `self`, with the same
    /// length or length one.
    pub fn binary_op(&self, other: &Variable, op: BinaryOp) -> Result<Self> {
        let incompatible = || ResampleError::IncompatibleDimensions {
            message: format!(
                "cannot broadcast dimensions {:?} against {:?}",
                other.dims, self.dims
            ),
        };

        if other.dims.iter().any(|d| !self.has_dim(d)) {
            return Err(incompatible());
        }

        // order other's axes as they appear in self, then add the missing ones
        let perm: Vec<usize> = self
            .dims
            .iter()
            .filter_map(|d| other.axis_of(d))
            .collect();
        let mut aligned = other.data.view().permuted_axes(IxDyn(&perm));
        for (i, dim) in self.dims.iter().enumerate() {
            if !other.has_dim(dim) {
                aligned.insert_axis_inplace(Axis(i));
            }
        }
        let broadcast = aligned.broadcast(self.data.raw_dim()).ok_or_else(incompatible)?;

        let data = Zip::from(&self.data)
            .and(&broadcast)
            .map_collect(|&lhs, &rhs| op.apply(lhs, rhs));
        Ok(Self {
            dims: self.dims.clone(),
            data,
            attrs: self.attrs.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(dims: &[&str], shape: &[usize], values: Vec<f64>) -> Variable {
        Variable::new(dims, ArrayD::from_shape_vec(shape.to_vec(), values).unwrap()).unwrap()
    }

    #[test]
    fn duplicate_dimension_names_are_rejected() {
        let data = ArrayD::<f64>::zeros(vec![2, 2]);
        match Variable::new(&["x", "x"], data) {
            Err(ResampleError::DuplicateName { name }) => assert_eq!(name, "x"),
            other => panic!("Expected DuplicateName, got {:?}", other),
        }
    }

    #[test]
    fn stack_puts_the_new_dimension_first() {
        let a = var(&["x"], &[2], vec![1.0, 2.0]);
        let b = var(&["x"], &[2], vec![3.0, 4.0]);
        let stacked = Variable::stack(&[a, b], "g").unwrap();
        assert_eq!(stacked.dims(), &["g".to_string(), "x".to_string()]);
        assert_eq!(stacked.shape(), &[2, 2]);
        assert_eq!(stacked.data()[[1, 0]], 3.0);
    }

    #[test]
    fn transpose_reorders_axes_by_name() {
        let v = var(&["t", "x"], &[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let swapped = v.transpose(&["x", "t"]).unwrap();
        assert_eq!(swapped.dims(), &["x".to_string(), "t".to_string()]);
        assert_eq!(swapped.data().iter().copied().collect::<Vec<_>>(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert!(matches!(
            v.transpose(&["x", "x"]),
            Err(ResampleError::IncompatibleDimensions { .. })
        ));
    }

    #[test]
    fn concat_joins_along_the_named_axis() {
        let a = var(&["x", "t"], &[1, 2], vec![1.0, 2.0]);
        let b = var(&["x", "t"], &[1, 1], vec![3.0]);
        let joined = Variable::concat(&[a, b], "t").unwrap();
        assert_eq!(joined.shape(), &[1, 3]);
        assert_eq!(joined.data().iter().copied().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn binary_op_broadcasts_by_name() {
        // (t: 2, x: 3) minus (x: 3)
        let lhs = var(&["t", "x"], &[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let rhs = var(&["x"], &[3], vec![1.0, 1.0, 2.0]);
        let out = lhs.binary_op(&rhs, BinaryOp::Sub).unwrap();
        assert_eq!(out.data().iter().copied().collect::<Vec<_>>(), vec![0.0, 1.0, 1.0, 3.0, 4.0, 4.0]);

        // transposed operand is realigned
        let rhs_t = var(&["x", "t"], &[3, 2], vec![1.0, 10.0, 1.0, 10.0, 1.0, 10.0]);
        let out = lhs.binary_op(&rhs_t, BinaryOp::Mul).unwrap();
        assert_eq!(out.data()[[1, 2]], 60.0);
    }

    #[test]
    fn binary_op_rejects_foreign_dimensions() {
        let lhs = var(&["t"], &[2], vec![1.0, 2.0]);
        let rhs = var(&["y"], &[2], vec![1.0, 2.0]);
        assert!(matches!(
            lhs.binary_op(&rhs, BinaryOp::Add),
            Err(ResampleError::IncompatibleDimensions { .. })
        ));
    }

    #[test]
    fn reduce_without_dim_collapses_everything() {
        let v = var(&["t", "x"], &[2, 2], vec![1.0, 2.0, 3.0, 4.0]);
        let total = v.reduce(&|d: &ArrayD<f64>, axis: usize| Ok(d.sum_axis(Axis(axis))), None, false).unwrap();
        assert_eq!(total.ndim(), 0);
        assert_eq!(total.data().iter().copied().collect::<Vec<_>>(), vec![10.0]);
    }
}
