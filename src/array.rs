//! Labeled n-dimensional arrays
//!
//! A [`DataArray`] is a [`Variable`] plus coordinates and an optional name.

use crate::accessors::DatetimeAccessor;
use crate::coords::{self, Coordinate, Coords, Label};
use crate::errors::{Result, ResampleError};
use crate::ops::BinaryOp;
use crate::resample::{DataArrayResample, RESAMPLE_DIM};
use crate::variable::{Attrs, Variable};
use ndarray::ArrayD;

/// An n-dimensional array with named dimensions and coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    name: Option<String>,
    variable: Variable,
    coords: Coords,
}

impl DataArray {
    /// Create an array; `dims` must name every axis of `data` exactly once.
    pub fn new<S: AsRef<str>>(data: ArrayD<f64>, dims: &[S]) -> Result<Self> {
        Ok(Self::from_variable(Variable::new(dims, data)?))
    }

    /// Wrap a variable with no coordinates.
    #[must_use]
    pub fn from_variable(variable: Variable) -> Self {
        Self {
            name: None,
            variable,
            coords: Coords::new(),
        }
    }

    pub(crate) fn from_parts(name: Option<String>, variable: Variable, coords: Coords) -> Self {
        Self {
            name,
            variable,
            coords,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.variable = self.variable.with_attrs(attrs);
        self
    }

    /// Attach a coordinate; its dimension must exist with a matching length.
    pub fn with_coord(mut self, name: impl Into<String>, coord: Coordinate) -> Result<Self> {
        let name = name.into();
        let dim_len = coord.dim().and_then(|d| self.variable.dim_len(d));
        coords::check_coordinate(&name, &coord, dim_len)?;
        self.coords.insert(name, coord);
        Ok(self)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| "<unnamed>".to_string())
    }

    #[must_use]
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    #[must_use]
    pub fn into_variable(self) -> Variable {
        self.variable
    }

    #[must_use]
    pub fn data(&self) -> &ArrayD<f64> {
        self.variable.data()
    }

    #[must_use]
    pub fn dims(&self) -> &[String] {
        self.variable.dims()
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.variable.shape()
    }

    #[must_use]
    pub fn attrs(&self) -> &Attrs {
        self.variable.attrs()
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

    #[must_use]
    pub fn has_dim(&self, dim: &str) -> bool {
        self.variable.has_dim(dim)
    }

    /// True when `name` is a dimension or a coordinate of the array.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.has_dim(name) || self.coords.contains_key(name)
    }

    /// Replaces the data, keeping dimensions, coordinates and attributes.
    pub fn with_data(&self, data: ArrayD<f64>) -> Result<Self> {
        Ok(Self {
            name: self.name.clone(),
            variable: self.variable.with_data(data)?,
            coords: self.coords.clone(),
        })
    }

    fn require_dim(&self, dim: &str) -> Result<()> {
        if self.has_dim(dim) {
            Ok(())
        } else {
            Err(ResampleError::DimensionNotFound {
                var: self.display_name(),
                dim: dim.to_string(),
            })
        }
    }

    /// Takes `positions` along `dim`, in that order.
    pub fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self> {
        self.require_dim(dim)?;
        let coords = self
            .coords
            .iter()
            .map(|(name, c)| {
                let c = if c.runs_along(dim) { c.select(positions)? } else { c.clone() };
                Ok((name.clone(), c))
            })
            .collect::<Result<Coords>>()?;
        Ok(Self {
            name: self.name.clone(),
            variable: self.variable.isel(dim, positions)?,
            coords,
        })
    }

    /// Takes one position along `dim`; coordinates along `dim` become scalars.
    pub fn isel_point(&self, dim: &str, index: usize) -> Result<Self> {
        self.require_dim(dim)?;
        let coords = self
            .coords
            .iter()
            .map(|(name, c)| {
                let c = if c.runs_along(dim) { c.point(index)? } else { c.clone() };
                Ok((name.clone(), c))
            })
            .collect::<Result<Coords>>()?;
        Ok(Self {
            name: self.name.clone(),
            variable: self.variable.isel_point(dim, index)?,
            coords,
        })
    }

    /// Selects the position of `label` in the coordinate named `dim`.
    pub fn sel_label(&self, dim: &str, label: &Label) -> Result<Self> {
        self.require_dim(dim)?;
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

    /// Renames the dimension `from` to `to`, along with its coordinates.
    pub fn rename_dim(self, from: &str, to: &str) -> Result<Self> {
        self.require_dim(from)?;
        if from != to && (self.has_dim(to) || self.coords.contains_key(to)) {
            return Err(ResampleError::DuplicateName { name: to.to_string() });
        }
        Ok(Self {
            name: self.name,
            variable: self.variable.rename_dim(from, to)?,
            coords: coords::rename_coords(self.coords, from, to),
        })
    }

    /// Reorders the axes to follow `order`.
    pub fn transpose<S: AsRef<str>>(&self, order: &[S]) -> Result<Self> {
        Ok(Self {
            name: self.name.clone(),
            variable: self.variable.transpose(order)?,
            coords: self.coords.clone(),
        })
    }

    /// Collapses `dim` with `func` (every dimension when `None`).
    ///
    /// Coordinates along the collapsed dimension are dropped.
    pub fn reduce<F>(&self, func: &F, dim: Option<&str>, keep_attrs: bool) -> Result<Self>
    where
        F: Fn(&ArrayD<f64>, usize) -> Result<ArrayD<f64>> + ?Sized,
    {
        if let Some(dim) = dim {
            self.require_dim(dim)?;
        }
        let coords = self
            .coords
            .iter()
            .filter(|(_, c)| match (dim, c.dim()) {
                (_, None) => true,
                (Some(dim), Some(along)) => along != dim,
                (None, Some(_)) => false,
            })
            .map(|(name, c)| (name.clone(), c.clone()))
            .collect();
        Ok(Self {
            name: self.name.clone(),
            variable: self.variable.reduce(func, dim, keep_attrs)?,
            coords,
        })
    }

    /// Combines elementwise with `other`, broadcast over this array.
    pub fn binary_op(&self, other: &DataArray, op: BinaryOp) -> Result<Self> {
        Ok(Self {
            name: self.name.clone(),
            variable: self.variable.binary_op(&other.variable, op)?,
            coords: self.coords.clone(),
        })
    }

    /// Concatenates arrays along their shared dimension `dim`.
    pub fn concat(items: Vec<DataArray>, dim: &str) -> Result<Self> {
        let first = items.first().ok_or_else(|| ResampleError::Generic(
            "cannot concatenate an empty list of arrays".to_string(),
        ))?;
        let name = first.name.clone();
        let coord_sets: Vec<&Coords> = items.iter().map(|a| &a.coords).collect();
        let coords = coords::concat_coords(&coord_sets, dim)?;
        let variables: Vec<Variable> = items.into_iter().map(|a| a.variable).collect();
        Ok(Self {
            name,
            variable: Variable::concat(&variables, dim)?,
            coords,
        })
    }

    /// Stacks arrays along a new leading dimension indexed by `key_coord`.
    pub fn stack(items: Vec<DataArray>, new_dim: &str, key_coord: Coordinate) -> Result<Self> {
        let first = items.first().ok_or_else(|| ResampleError::Generic(
            "cannot stack an empty list of arrays".to_string(),
        ))?;
        let name = first.name.clone();
        let coord_sets: Vec<&Coords> = items.iter().map(|a| &a.coords).collect();
        let coords = coords::stack_coords(&coord_sets, new_dim, key_coord)?;
        let variables: Vec<Variable> = items.into_iter().map(|a| a.variable).collect();
        Ok(Self {
            name,
            variable: Variable::stack(&variables, new_dim)?,
            coords,
        })
    }

    /// Rebuild an array from a raw variable, keeping the coordinates of this
    /// array that still fit the variable's dimensions.
    pub(crate) fn replace_maybe_drop_dims(&self, variable: Variable, extra: Coords) -> Self {
        let mut coords: Coords = self
            .coords
            .iter()
            .filter(|(_, c)| match c.dim() {
                None => true,
                Some(dim) => variable.dim_len(dim) == Some(c.len()),
            })
            .map(|(name, c)| (name.clone(), c.clone()))
            .collect();
        coords.extend(extra);
        Self {
            name: self.name.clone(),
            variable,
            coords,
        }
    }

    /// Groups this array along `dim` by one label per position, for resampling.
    ///
    /// The proxy dimension is [`RESAMPLE_DIM`].
    pub fn resample(&self, dim: &str, labels: &[Label]) -> Result<DataArrayResample> {
        let group = Coordinate::from_labels(dim, labels)?;
        DataArrayResample::new(self.clone(), &group, dim, RESAMPLE_DIM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::CoordValues;

    fn sample() -> DataArray {
        let data = ArrayD::from_shape_vec(vec![4, 2], (0..8).map(f64::from).collect()).unwrap();
        DataArray::new(data, &["time", "x"])
            .unwrap()
            .with_name("temperature")
            .with_coord("time", Coordinate::new("time", CoordValues::Int(vec![10, 20, 30, 40])))
            .unwrap()
            .with_coord("x", Coordinate::new("x", CoordValues::Text(vec!["a".into(), "b".into()])))
            .unwrap()
    }

    #[test]
    fn coordinate_length_is_checked() {
        let arr = sample();
        let bad = Coordinate::new("time", CoordValues::Int(vec![1, 2]));
        assert!(matches!(
            arr.with_coord("bad", bad),
            Err(ResampleError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn contains_checks_dimensions_and_coordinates() {
        let arr = sample();
        assert!(arr.contains("time"));
        assert!(!arr.contains("__resample_dim__"));
        let dropped = arr.drop_coord("time").unwrap();
        assert!(dropped.contains("time"));
        assert!(dropped.coord("time").is_err());
    }

    #[test]
    fn sel_label_leaves_a_scalar_coordinate() {
        let point = sample().sel_label("time", &Label::Int(30)).unwrap();
        assert_eq!(point.dims(), &["x".to_string()]);
        assert_eq!(point.data().iter().copied().collect::<Vec<_>>(), vec![4.0, 5.0]);
        assert!(point.coord("time").unwrap().is_scalar());
    }

    #[test]
    fn rename_moves_coordinates() {
        let renamed = sample().rename_dim("time", "t").unwrap();
        assert_eq!(renamed.dims()[0], "t");
        assert!(renamed.coord("t").unwrap().runs_along("t"));
        assert!(matches!(
            sample().rename_dim("missing", "t"),
            Err(ResampleError::DimensionNotFound { .. })
        ));
        assert!(matches!(
            sample().rename_dim("time", "x"),
            Err(ResampleError::DuplicateName { .. })
        ));
    }
}
