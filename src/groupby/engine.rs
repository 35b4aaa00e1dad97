//! The grouping engine shared by array and dataset resampling

use super::{CombineStrategy, GroupOutput, Groupable, Groups};
use crate::array::DataArray;
use crate::coords::{Coordinate, Coords};
use crate::errors::{Result, ResampleError};
use crate::ops::BinaryOp;
use crate::variable::Variable;
use tracing::debug;

/// A container split into groups along one dimension
#[derive(Debug, Clone)]
pub struct GroupBy<T: Groupable> {
    obj: T,
    group_dim: String,
    name: String,
    groups: Groups,
}

impl<T: Groupable> GroupBy<T> {
    /// Groups `obj` by the labels of `group`, which must run along a dimension
    /// of `obj` and have one value per position.
    ///
    /// `name` is the dimension results are stacked along when the grouped
    /// dimension does not survive the applied function.
    ///
    /// # Errors
    ///
    /// Fails for scalar or mis-sized group coordinates, float labels and
    /// empty dimensions.
    pub fn new(obj: T, name: &str, group: &Coordinate) -> Result<Self> {
        let group_dim = group.dim().ok_or_else(|| ResampleError::IncompatibleDimensions {
            message: "a scalar coordinate cannot define groups".to_string(),
        })?;
        let len = obj.dim_len(group_dim).ok_or_else(|| ResampleError::DimensionNotFound {
            var: obj.display_name(),
            dim: group_dim.to_string(),
        })?;
        if len != group.len() {
            return Err(ResampleError::ShapeMismatch {
                message: format!(
                    "group has {} labels but dimension '{group_dim}' has length {len}",
                    group.len()
                ),
            });
        }
        let groups = Groups::from_labels(group_dim, &group.labels()?)?;
        debug!(dim = group_dim, groups = groups.len(), "grouped positions by label");

        Ok(Self {
            obj,
            group_dim: group_dim.to_string(),
            name: name.to_string(),
            groups,
        })
    }

    #[must_use]
    pub fn obj(&self) -> &T {
        &self.obj
    }

    /// The dimension the groups partition
    #[must_use]
    pub fn group_dim(&self) -> &str {
        &self.group_dim
    }

    /// The dimension stacked results are indexed by
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// Each group as its own container, built lazily in key order.
    pub fn iter_grouped(&self) -> impl Iterator<Item = Result<T>> + '_ {
        self.groups
            .positions()
            .iter()
            .map(move |positions| self.obj.isel(&self.group_dim, positions))
    }

    /// Joins per-group results, in group order.
    pub fn combine(&self, applied: Vec<T>) -> Result<T> {
        let first = applied.first().ok_or_else(|| ResampleError::EmptyGroups {
            dim: self.group_dim.clone(),
        })?;
        let strategy = CombineStrategy::choose(first.has_dim(&self.group_dim));
        debug!(
            strategy = strategy.as_str(),
            pieces = applied.len(),
            dim = %self.group_dim,
            "combining grouped results"
        );
        match strategy {
            CombineStrategy::ConcatExisting => T::concat(applied, &self.group_dim),
            CombineStrategy::StackNew => {
                let keys = self.groups.key_coordinate(&self.name)?;
                T::stack(applied, &self.name, keys)
            }
        }
    }

    /// Applies `func` to every group and joins the results.
    ///
    /// The first error from `func` is returned as is.
    pub fn apply<F>(&self, mut func: F) -> Result<T>
    where
        F: FnMut(T) -> Result<T>,
    {
        let applied = self
            .iter_grouped()
            .map(|group| func(group?))
            .collect::<Result<Vec<_>>>()?;
        self.combine(applied)
    }

    /// Combines each group elementwise with the entry of `other` labeled by
    /// the group's key.
    ///
    /// When `other` lacks the grouped dimension it is applied whole to every
    /// group.
    pub fn binary_op(&self, other: &DataArray, op: BinaryOp) -> Result<T> {
        let applied = self
            .groups
            .keys()
            .iter()
            .zip(self.iter_grouped())
            .map(|(key, group)| {
                let group = group?;
                if other.has_dim(&self.group_dim) {
                    group.binary_op(&other.sel_label(&self.group_dim, key)?, op)
                } else {
                    group.binary_op(other, op)
                }
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(op = op.as_str(), groups = applied.len(), "applied grouped binary operation");
        self.combine(applied)
    }
}

impl GroupBy<DataArray> {
    /// Each group as a bare variable, skipping coordinate bookkeeping.
    pub fn iter_grouped_shortcut(&self) -> impl Iterator<Item = Result<Variable>> + '_ {
        self.groups
            .positions()
            .iter()
            .map(move |positions| self.obj.variable().isel(&self.group_dim, positions))
    }

    /// Joins per-group variables and reattaches the coordinates of the
    /// grouped array that still fit.
    pub fn combine_shortcut(&self, applied: Vec<Variable>) -> Result<DataArray> {
        let first = applied.first().ok_or_else(|| ResampleError::EmptyGroups {
            dim: self.group_dim.clone(),
        })?;
        let strategy = CombineStrategy::choose(first.has_dim(&self.group_dim));
        debug!(
            strategy = strategy.as_str(),
            pieces = applied.len(),
            dim = %self.group_dim,
            "combining grouped variables"
        );

        let mut extra = Coords::new();
        let combined = match strategy {
            CombineStrategy::ConcatExisting => {
                let combined = Variable::concat(&applied, &self.group_dim)?;
                let order = self.groups.flat_positions();
                if combined.dim_len(&self.group_dim) == Some(order.len()) {
                    for (name, coord) in self.obj.coords() {
                        if coord.runs_along(&self.group_dim) {
                            extra.insert(name.clone(), coord.select(&order)?);
                        }
                    }
                }
                combined
            }
            CombineStrategy::StackNew => {
                extra.insert(self.name.clone(), self.groups.key_coordinate(&self.name)?);
                Variable::stack(&applied, &self.name)?
            }
        };
        Ok(self.obj.replace_maybe_drop_dims(combined, extra))
    }

    /// Puts the axes of a combined result back in the grouped array's order.
    ///
    /// The stacking dimension takes the place of the grouped one; axes the
    /// grouped array never had go last.
    pub fn restore_dim_order(&self, combined: DataArray) -> Result<DataArray> {
        let position = |dim: &str| {
            let dim = if dim == self.name { self.group_dim.as_str() } else { dim };
            self.obj.variable().axis_of(dim).unwrap_or(usize::MAX)
        };
        let mut order = combined.dims().to_vec();
        order.sort_by_key(|d| position(d.as_str()));
        if order.as_slice() == combined.dims() {
            return Ok(combined);
        }
        combined.transpose(order.as_slice())
    }

    /// Applies `func` to every group through the shortcut path.
    ///
    /// Each group reaches `func` as an array without coordinates.
    pub fn apply_shortcut<F, R>(&self, mut func: F) -> Result<DataArray>
    where
        F: FnMut(DataArray) -> Result<R>,
        R: Into<GroupOutput>,
    {
        let name = self.obj.name().map(str::to_string);
        let applied = self
            .iter_grouped_shortcut()
            .map(|variable| {
                let template = DataArray::from_parts(name.clone(), variable?, Coords::new());
                let output: GroupOutput = func(template.clone())?.into();
                Ok(output.into_array(&template)?.into_variable())
            })
            .collect::<Result<Vec<_>>>()?;
        self.combine_shortcut(applied)
    }
}
