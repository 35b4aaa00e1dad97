//! Keyed collections of variables sharing dimensions
//!
//! A [`Dataset`] maps member names to [`Variable`]s whose shared dimensions
//! have consistent lengths, with coordinates and attributes held once for the
//! whole collection.

use crate::accessors::DatetimeAccessor;
use crate::array::DataArray;
use crate::coords::{self, Coordinate, Coords, Label};
use crate::errors::{Result, ResampleError};
use crate::ops::BinaryOp;
use crate::resample::{DatasetResample, RESAMPLE_DIM};
use crate::variable::{Attrs, Variable};
use ndarray::ArrayD;
use std::collections::BTreeMap;
use tracing::trace;

/// A collection of named variables sharing dimensions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    data_vars: BTreeMap<String, Variable>,
    coords: Coords,
    attrs: Attrs,
}

impl Dataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member; its dimension lengths must agree with existing members.
    pub fn with_variable(mut self, name: impl Into<String>, variable: Variable) -> Result<Self> {
        let name = name.into();
        for (dim, &len) in variable.dims().iter().zip(variable.shape()) {
            if let Some(existing) = self.dim_len(dim) {
                if existing != len {
                    return Err(ResampleError::ShapeMismatch {
                        message: format!(
                            "variable '{name}' has length {len} along '{dim}', dataset has {existing}"
                        ),
                    });
                }
            }
        }
        self.data_vars.insert(name, variable);
        Ok(self)
    }

    /// Attach a coordinate; its dimension must exist with a matching length.
    pub fn with_coord(mut self, name: impl Into<String>, coord: Coordinate) -> Result<Self> {
        let name = name.into();
        let dim_len = coord.dim().and_then(|d| self.dim_len(d));
        coords::check_coordinate(&name, &coord, dim_len)?;
        self.coords.insert(name, coord);
        Ok(self)
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    #[must_use]
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    #[must_use]
    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    /// Look up a coordinate by name.
    pub fn coord(&self, name: &str) -> Result<&Coordinate> {
        self.coords.get(name).ok_or_else(|| ResampleError::CoordinateNotFound {
            name: name.to_string(),
        })
    }

    /// Datetime fields of the coordinate `name`.
    pub fn dt(&self, name: &str) -> Result<DatetimeAccessor<'_>> {
        self.coord(name)?.dt()
    }

    /// Member names in key order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.data_vars.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data_vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_vars.is_empty()
    }

    /// Look up a member variable.
    pub fn variable(&self, name: &str) -> Result<&Variable> {
        self.data_vars.get(name).ok_or_else(|| ResampleError::VariableNotFound {
            var: name.to_string(),
        })
    }

    /// A member as a [`DataArray`] carrying the coordinates that fit it.
    pub fn get(&self, name: &str) -> Result<DataArray> {
        let variable = self.variable(name)?.clone();
        let fitting: Coords = self
            .coords
            .iter()
            .filter(|(_, c)| c.dim().map_or(true, |d| variable.has_dim(d)))
            .map(|(n, c)| (n.clone(), c.clone()))
            .collect();
        Ok(DataArray::from_parts(Some(name.to_string()), variable, fitting))
    }

    /// Length of `dim` across members and coordinates
    #[must_use]
    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        self.data_vars
            .values()
            .find_map(|v| v.dim_len(dim))
            .or_else(|| self.coords.values().find(|c| c.runs_along(dim)).map(Coordinate::len))
    }

    /// Dimension names and lengths
    #[must_use]
    pub fn dims(&self) -> BTreeMap<String, usize> {
        let mut dims = BTreeMap::new();
        for v in self.data_vars.values() {
            for (dim, &len) in v.dims().iter().zip(v.shape()) {
                dims.insert(dim.clone(), len);
            }
        }
        for c in self.coords.values() {
            if let Some(dim) = c.dim() {
                dims.entry(dim.to_string()).or_insert(c.len());
            }
        }
        dims
    }

    #[must_use]
    pub fn has_dim(&self, dim: &str) -> bool {
        self.dim_len(dim).is_some()
    }

    /// True when `name` is a dimension, coordinate or member.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.has_dim(name) || self.coords.contains_key(name) || self.data_vars.contains_key(name)
    }

    fn require_dim(&self, dim: &str) -> Result<()> {
        if self.has_dim(dim) {
            Ok(())
        } else {
            Err(ResampleError::DimensionNotFound {
                var: "<dataset>".to_string(),
                dim: dim.to_string(),
            })
        }
    }

    /// Takes `positions` along `dim` in every member and coordinate.
    pub fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self> {
        self.require_dim(dim)?;
        let data_vars = self
            .data_vars
            .iter()
            .map(|(name, v)| {
                let v = if v.has_dim(dim) { v.isel(dim, positions)? } else { v.clone() };
                Ok((name.clone(), v))
            })
            .collect::<Result<_>>()?;
        let coords = self
            .coords
            .iter()
            .map(|(name, c)| {
                let c = if c.runs_along(dim) { c.select(positions)? } else { c.clone() };
                Ok((name.clone(), c))
            })
            .collect::<Result<_>>()?;
        Ok(Self {
            data_vars,
            coords,
            attrs: self.attrs.clone(),
        })
    }

    /// Takes one position along `dim`; coordinates along `dim` become scalars.
    pub fn isel_point(&self, dim: &str, index: usize) -> Result<Self> {
        self.require_dim(dim)?;
        let data_vars = self
            .data_vars
            .iter()
            .map(|(name, v)| {
                let v = if v.has_dim(dim) { v.isel_point(dim, index)? } else { v.clone() };
                Ok((name.clone(), v))
            })
            .collect::<Result<_>>()?;
        let coords = self
            .coords
            .iter()
            .map(|(name, c)| {
                let c = if c.runs_along(dim) { c.point(index)? } else { c.clone() };
                Ok((name.clone(), c))
            })
            .collect::<Result<_>>()?;
        Ok(Self {
            data_vars,
            coords,
            attrs: self.attrs.clone(),
        })
    }

    /// Selects the position of `label` in the coordinate named `dim`.
    pub fn sel_label(&self, dim: &str, label: &Label) -> Result<Self> {
        let index = self
            .coord(dim)?
            .values()
            .position_of(label)
            .ok_or_else(|| ResampleError::LabelNotFound {
                dim: dim.to_string(),
                label: label.to_string(),
            })?;
        self.isel_point(dim, index)
    }

    /// Removes the coordinate `name`.
    pub fn drop_coord(mut self, name: &str) -> Result<Self> {
        if self.coords.remove(name).is_none() {
            return Err(ResampleError::CoordinateNotFound {
                name: name.to_string(),
            });
        }
        Ok(self)
    }

    /// Renames the dimension `from` to `to` in every member and coordinate.
    pub fn rename_dim(self, from: &str, to: &str) -> Result<Self> {
        self.require_dim(from)?;
        if from != to && (self.has_dim(to) || self.coords.contains_key(to) || self.data_vars.contains_key(to)) {
            return Err(ResampleError::DuplicateName { name: to.to_string() });
        }
        let data_vars = self
            .data_vars
            .into_iter()
            .map(|(name, v)| {
                let v = if v.has_dim(from) { v.rename_dim(from, to)? } else { v };
                Ok((name, v))
            })
            .collect::<Result<_>>()?;
        Ok(Self {
            data_vars,
            coords: coords::rename_coords(self.coords, from, to),
            attrs: self.attrs,
        })
    }

    /// Collapses `dim` (every dimension when `None`) in each member.
    ///
    /// Members without `dim` are kept unchanged; coordinates along `dim` are
    /// dropped. With `keep_attrs` the dataset and member attributes survive.
    pub fn reduce<F>(&self, func: &F, dim: Option<&str>, keep_attrs: bool) -> Result<Self>
    where
        F: Fn(&ArrayD<f64>, usize) -> Result<ArrayD<f64>> + ?Sized,
    {
        if let Some(dim) = dim {
            self.require_dim(dim)?;
        }
        let data_vars = self
            .data_vars
            .iter()
            .map(|(name, v)| {
                let reduced = match dim {
                    Some(d) if !v.has_dim(d) => v.clone(),
                    _ => v.reduce(func, dim, keep_attrs)?,
                };
                Ok((name.clone(), reduced))
            })
            .collect::<Result<_>>()?;
        let coords = self
            .coords
            .iter()
            .filter(|(_, c)| match (dim, c.dim()) {
                (_, None) => true,
                (Some(dim), Some(along)) => along != dim,
                (None, Some(_)) => false,
            })
            .map(|(n, c)| (n.clone(), c.clone()))
            .collect();
        Ok(Self {
            data_vars,
            coords,
            attrs: if keep_attrs { self.attrs.clone() } else { Attrs::new() },
        })
    }

    /// Combines elementwise with `other` every member that has all of its
    /// dimensions. The other members are kept unchanged.
    pub fn binary_op(&self, other: &DataArray, op: BinaryOp) -> Result<Self> {
        let data_vars = self
            .data_vars
            .iter()
            .map(|(name, v)| {
                let combined = if other.dims().iter().all(|d| v.has_dim(d)) {
                    v.binary_op(other.variable(), op)?
                } else {
                    trace!(member = %name, op = op.as_str(), "member lacks operand dimensions, kept as is");
                    v.clone()
                };
                Ok((name.clone(), combined))
            })
            .collect::<Result<_>>()?;
        Ok(Self {
            data_vars,
            coords: self.coords.clone(),
            attrs: self.attrs.clone(),
        })
    }

    /// Members of every piece under the first piece's names, in piece order.
    fn gather(items: &[Dataset]) -> Result<BTreeMap<String, Vec<Variable>>> {
        let mut gathered = BTreeMap::new();
        let Some(first) = items.first() else {
            return Ok(gathered);
        };
        for name in first.data_vars.keys() {
            let column = items
                .iter()
                .map(|ds| ds.variable(name).cloned())
                .collect::<Result<Vec<_>>>()?;
            gathered.insert(name.clone(), column);
        }
        if let Some(extra) = items
            .iter()
            .flat_map(|ds| ds.data_vars.keys())
            .find(|n| !first.data_vars.contains_key(*n))
        {
            return Err(ResampleError::VariableNotFound { var: extra.clone() });
        }
        Ok(gathered)
    }

    /// Concatenates datasets member by member along the shared dimension `dim`.
    ///
    /// Members without `dim` are taken from the first piece.
    pub fn concat(items: Vec<Dataset>, dim: &str) -> Result<Self> {
        let first = items.first().ok_or_else(|| ResampleError::Generic(
            "cannot concatenate an empty list of datasets".to_string(),
        ))?;
        let attrs = first.attrs.clone();
        let coord_sets: Vec<&Coords> = items.iter().map(|d| &d.coords).collect();
        let coords = coords::concat_coords(&coord_sets, dim)?;

        let mut data_vars = BTreeMap::new();
        for (name, column) in Self::gather(&items)? {
            let merged = if column[0].has_dim(dim) {
                Variable::concat(&column, dim)?
            } else {
                trace!(var = %name, dim, "member without the concatenated dimension kept from first piece");
                column[0].clone()
            };
            data_vars.insert(name, merged);
        }
        Ok(Self {
            data_vars,
            coords,
            attrs,
        })
    }

    /// Stacks datasets member by member along a new dimension indexed by `key_coord`.
    pub fn stack(items: Vec<Dataset>, new_dim: &str, key_coord: Coordinate) -> Result<Self> {
        let first = items.first().ok_or_else(|| ResampleError::Generic(
            "cannot stack an empty list of datasets".to_string(),
        ))?;
        let attrs = first.attrs.clone();
        let coord_sets: Vec<&Coords> = items.iter().map(|d| &d.coords).collect();
        let coords = coords::stack_coords(&coord_sets, new_dim, key_coord)?;

        let data_vars = Self::gather(&items)?
            .into_iter()
            .map(|(name, column)| Ok((name, Variable::stack(&column, new_dim)?)))
            .collect::<Result<_>>()?;
        Ok(Self {
            data_vars,
            coords,
            attrs,
        })
    }

    /// Groups this dataset along `dim` by one label per position, for resampling.
    ///
    /// The proxy dimension is [`RESAMPLE_DIM`].
    pub fn resample(&self, dim: &str, labels: &[Label]) -> Result<DatasetResample> {
        let group = Coordinate::from_labels(dim, labels)?;
        DatasetResample::new(self.clone(), &group, dim, RESAMPLE_DIM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::CoordValues;

    fn var(dims: &[&str], shape: &[usize], values: Vec<f64>) -> Variable {
        Variable::new(dims, ArrayD::from_shape_vec(shape.to_vec(), values).unwrap()).unwrap()
    }

    fn sample() -> Dataset {
        Dataset::new()
            .with_variable("a", var(&["time"], &[3], vec![1.0, 2.0, 3.0]))
            .unwrap()
            .with_variable("b", var(&["time", "x"], &[3, 2], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
            .unwrap()
            .with_variable("c", var(&["x"], &[2], vec![7.0, 8.0]))
            .unwrap()
            .with_coord("time", Coordinate::new("time", CoordValues::Int(vec![0, 1, 2])))
            .unwrap()
    }

    #[test]
    fn inconsistent_lengths_are_rejected() {
        let ds = sample();
        assert!(matches!(
            ds.with_variable("d", var(&["time"], &[2], vec![0.0, 0.0])),
            Err(ResampleError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn reduce_keeps_members_without_the_dimension() {
        let sum = |d: &ArrayD<f64>, axis: usize| Ok(d.sum_axis(ndarray::Axis(axis)));
        let reduced = sample().reduce(&sum, Some("time"), false).unwrap();
        assert_eq!(reduced.variable("a").unwrap().ndim(), 0);
        assert_eq!(reduced.variable("b").unwrap().shape(), &[2]);
        assert_eq!(reduced.variable("c").unwrap(), sample().variable("c").unwrap());
        assert!(reduced.coord("time").is_err());
    }

    #[test]
    fn stack_requires_matching_members() {
        let ds = sample();
        let other = Dataset::new()
            .with_variable("a", var(&["time"], &[3], vec![0.0, 0.0, 0.0]))
            .unwrap();
        let keys = Coordinate::new("g", CoordValues::Int(vec![0, 1]));
        match Dataset::stack(vec![ds, other], "g", keys) {
            Err(ResampleError::VariableNotFound { var }) => assert_eq!(var, "b"),
            other => panic!("Expected VariableNotFound, got {:?}", other),
        }
    }

    #[test]
    fn binary_op_skips_members_without_operand_dimensions() {
        let offsets = DataArray::new(ArrayD::from_shape_vec(vec![2], vec![1.0, 2.0]).unwrap(), &["x"]).unwrap();
        let shifted = sample().binary_op(&offsets, BinaryOp::Sub).unwrap();
        assert_eq!(shifted.variable("a").unwrap(), sample().variable("a").unwrap());
        assert_eq!(
            shifted.variable("b").unwrap().data().iter().copied().collect::<Vec<_>>(),
            vec![0.0, 0.0, 2.0, 2.0, 4.0, 4.0]
        );
        assert_eq!(
            shifted.variable("c").unwrap().data().iter().copied().collect::<Vec<_>>(),
            vec![6.0, 6.0]
        );
    }

    #[test]
    fn get_returns_member_with_fitting_coordinates() {
        let arr = sample().get("c").unwrap();
        assert_eq!(arr.name(), Some("c"));
        assert!(arr.coord("time").is_err());
        let arr = sample().get("a").unwrap();
        assert!(arr.coord("time").is_ok());
    }
}
