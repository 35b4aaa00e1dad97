//! Split-apply-combine over one dimension
//!
//! A [`GroupBy`] partitions a container along a dimension by one label per
//! position, hands each group to a user function and joins the results with a
//! [`CombineStrategy`]. Containers plug in through [`Groupable`].
//!
//! # Organization
//!
//! - [`groups`]: label to positions mapping
//! - [`combine`]: concat-versus-stack choice
//! - [`engine`]: the grouping engine itself

pub mod combine;
pub mod engine;
pub mod groups;

pub use combine::CombineStrategy;
pub use engine::GroupBy;
pub use groups::Groups;

use crate::array::DataArray;
use crate::coords::Coordinate;
use crate::dataset::Dataset;
use crate::errors::Result;
use crate::ops::BinaryOp;
use ndarray::ArrayD;

/// Containers that can be split into groups and joined back together
pub trait Groupable: Clone + Sized {
    /// How the container is named in error messages.
    fn display_name(&self) -> String;

    fn has_dim(&self, dim: &str) -> bool;

    fn dim_len(&self, dim: &str) -> Option<usize>;

    /// True when a coordinate called `name` is attached.
    fn has_coord(&self, name: &str) -> bool;

    fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self>;

    fn drop_coord(self, name: &str) -> Result<Self>;

    fn rename_dim(self, from: &str, to: &str) -> Result<Self>;

    fn binary_op(&self, other: &DataArray, op: BinaryOp) -> Result<Self>;

    /// Joins pieces along the dimension `dim` they all carry.
    fn concat(items: Vec<Self>, dim: &str) -> Result<Self>;

    /// Joins pieces along a new dimension indexed by `key_coord`.
    fn stack(items: Vec<Self>, new_dim: &str, key_coord: Coordinate) -> Result<Self>;
}

impl Groupable for DataArray {
    fn display_name(&self) -> String {
        DataArray::display_name(self)
    }

    fn has_dim(&self, dim: &str) -> bool {
        DataArray::has_dim(self, dim)
    }

    fn dim_len(&self, dim: &str) -> Option<usize> {
        self.variable().dim_len(dim)
    }

    fn has_coord(&self, name: &str) -> bool {
        self.coords().contains_key(name)
    }

    fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self> {
        DataArray::isel(self, dim, positions)
    }

    fn drop_coord(self, name: &str) -> Result<Self> {
        DataArray::drop_coord(self, name)
    }

    fn rename_dim(self, from: &str, to: &str) -> Result<Self> {
        DataArray::rename_dim(self, from, to)
    }

    fn binary_op(&self, other: &DataArray, op: BinaryOp) -> Result<Self> {
        DataArray::binary_op(self, other, op)
    }

    fn concat(items: Vec<Self>, dim: &str) -> Result<Self> {
        DataArray::concat(items, dim)
    }

    fn stack(items: Vec<Self>, new_dim: &str, key_coord: Coordinate) -> Result<Self> {
        DataArray::stack(items, new_dim, key_coord)
    }
}

impl Groupable for Dataset {
    fn display_name(&self) -> String {
        "<dataset>".to_string()
    }

    fn has_dim(&self, dim: &str) -> bool {
        Dataset::has_dim(self, dim)
    }

    fn dim_len(&self, dim: &str) -> Option<usize> {
        Dataset::dim_len(self, dim)
    }

    fn has_coord(&self, name: &str) -> bool {
        self.coords().contains_key(name)
    }

    fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self> {
        Dataset::isel(self, dim, positions)
    }

    fn drop_coord(self, name: &str) -> Result<Self> {
        Dataset::drop_coord(self, name)
    }

    fn rename_dim(self, from: &str, to: &str) -> Result<Self> {
        Dataset::rename_dim(self, from, to)
    }

    fn binary_op(&self, other: &DataArray, op: BinaryOp) -> Result<Self> {
        Dataset::binary_op(self, other, op)
    }

    fn concat(items: Vec<Self>, dim: &str) -> Result<Self> {
        Dataset::concat(items, dim)
    }

    fn stack(items: Vec<Self>, new_dim: &str, key_coord: Coordinate) -> Result<Self> {
        Dataset::stack(items, new_dim, key_coord)
    }
}

/// What a per-group function hands back for an array group
#[derive(Debug, Clone, PartialEq)]
pub enum GroupOutput {
    /// A complete labeled array
    Array(DataArray),
    /// A bare buffer, labeled from the group it was computed from
    Raw(ArrayD<f64>),
}

impl GroupOutput {
    /// Turns the output into an array, borrowing labels from `template` for
    /// raw buffers of the same shape.
    pub fn into_array(self, template: &DataArray) -> Result<DataArray> {
        match self {
            Self::Array(array) => Ok(array),
            Self::Raw(data) => template.with_data(data),
        }
    }
}

impl From<DataArray> for GroupOutput {
    fn from(array: DataArray) -> Self {
        Self::Array(array)
    }
}

impl From<ArrayD<f64>> for GroupOutput {
    fn from(data: ArrayD<f64>) -> Self {
        Self::Raw(data)
    }
}
