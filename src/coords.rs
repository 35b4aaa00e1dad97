//! Coordinate values, group labels and coordinate combination
//!
//! A [`Coordinate`] attaches index values to one dimension (or to no dimension,
//! for scalar coordinates left behind by point selections). Group keys are
//! [`Label`]s, which are totally ordered so that groups iterate in key order.

use crate::accessors::DatetimeAccessor;
use crate::errors::{Result, ResampleError};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

/// Coordinates of a container, keyed by coordinate name
pub type Coords = BTreeMap<String, Coordinate>;

/// A group key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Int(i64),
    Text(String),
    Time(NaiveDateTime),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(v) => write!(f, "{}", v),
            Label::Text(v) => write!(f, "{}", v),
            Label::Time(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Int(value)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Text(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Text(value)
    }
}

impl From<NaiveDateTime> for Label {
    fn from(value: NaiveDateTime) -> Self {
        Label::Time(value)
    }
}

/// Index values of a coordinate
#[derive(Debug, Clone, PartialEq)]
pub enum CoordValues {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Text(Vec<String>),
    Time(Vec<NaiveDateTime>),
}

impl CoordValues {
    /// Number of values
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Time(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the value kind, used in error messages
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "integer",
            Self::Text(_) => "string",
            Self::Time(_) => "datetime",
        }
    }

    /// Takes the values at `positions`, in that order.
    pub fn select(&self, positions: &[usize]) -> Result<Self> {
        let len = self.len();
        if let Some(&bad) = positions.iter().find(|&&p| p >= len) {
            return Err(ResampleError::ShapeMismatch {
                message: format!("position {bad} is out of bounds for coordinate of length {len}"),
            });
        }
        Ok(match self {
            Self::Float(v) => Self::Float(positions.iter().map(|&p| v[p]).collect()),
            Self::Int(v) => Self::Int(positions.iter().map(|&p| v[p]).collect()),
            Self::Text(v) => Self::Text(positions.iter().map(|&p| v[p].clone()).collect()),
            Self::Time(v) => Self::Time(positions.iter().map(|&p| v[p]).collect()),
        })
    }

    /// Concatenates values of the same kind.
    pub fn concat(parts: &[&CoordValues]) -> Result<Self> {
        let first = parts.first().ok_or_else(|| ResampleError::Generic(
            "cannot concatenate an empty list of coordinate values".to_string(),
        ))?;
        let mismatch = |other: &CoordValues| ResampleError::IncompatibleDimensions {
            message: format!(
                "cannot concatenate {} coordinate values with {} values",
                first.kind(),
                other.kind()
            ),
        };

        let mut out = match first {
            Self::Float(_) => Self::Float(Vec::new()),
            Self::Int(_) => Self::Int(Vec::new()),
            Self::Text(_) => Self::Text(Vec::new()),
            Self::Time(_) => Self::Time(Vec::new()),
        };
        for part in parts {
            match (&mut out, part) {
                (Self::Float(acc), Self::Float(v)) => acc.extend_from_slice(v),
                (Self::Int(acc), Self::Int(v)) => acc.extend_from_slice(v),
                (Self::Text(acc), Self::Text(v)) => acc.extend(v.iter().cloned()),
                (Self::Time(acc), Self::Time(v)) => acc.extend_from_slice(v),
                (_, other) => return Err(mismatch(other)),
            }
        }
        Ok(out)
    }

    /// The value at `index` as a group label.
    pub fn label_at(&self, index: usize) -> Result<Label> {
        let out_of_bounds = || ResampleError::ShapeMismatch {
            message: format!("index {index} is out of bounds for coordinate of length {}", self.len()),
        };
        match self {
            Self::Int(v) => v.get(index).map(|&x| Label::Int(x)).ok_or_else(out_of_bounds),
            Self::Text(v) => v.get(index).map(|x| Label::Text(x.clone())).ok_or_else(out_of_bounds),
            Self::Time(v) => v.get(index).map(|&x| Label::Time(x)).ok_or_else(out_of_bounds),
            Self::Float(_) => Err(ResampleError::UnsupportedGroupKey {
                kind: self.kind().to_string(),
            }),
        }
    }

    /// All values as group labels.
    pub fn labels(&self) -> Result<Vec<Label>> {
        (0..self.len()).map(|i| self.label_at(i)).collect()
    }

    /// Builds values from labels, which must all be of one kind.
    pub fn from_labels(labels: &[Label]) -> Result<Self> {
        let mixed = || ResampleError::UnsupportedGroupKey {
            kind: "mixed".to_string(),
        };
        match labels.first() {
            None | Some(Label::Int(_)) => labels
                .iter()
                .map(|l| match l {
                    Label::Int(v) => Ok(*v),
                    _ => Err(mixed()),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Int),
            Some(Label::Text(_)) => labels
                .iter()
                .map(|l| match l {
                    Label::Text(v) => Ok(v.clone()),
                    _ => Err(mixed()),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Text),
            Some(Label::Time(_)) => labels
                .iter()
                .map(|l| match l {
                    Label::Time(v) => Ok(*v),
                    _ => Err(mixed()),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Time),
        }
    }

    /// Position of the first value equal to `label`.
    #[must_use]
    pub fn position_of(&self, label: &Label) -> Option<usize> {
        match (self, label) {
            (Self::Int(v), Label::Int(x)) => v.iter().position(|y| y == x),
            (Self::Text(v), Label::Text(x)) => v.iter().position(|y| y == x),
            (Self::Time(v), Label::Time(x)) => v.iter().position(|y| y == x),
            _ => None,
        }
    }
}

/// Index values attached to a dimension, or a scalar coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    dim: Option<String>,
    values: CoordValues,
}

impl Coordinate {
    /// A one-dimensional coordinate along `dim`.
    pub fn new(dim: impl Into<String>, values: CoordValues) -> Self {
        Self {
            dim: Some(dim.into()),
            values,
        }
    }

    /// A scalar coordinate holding exactly one value.
    pub fn scalar(values: CoordValues) -> Result<Self> {
        if values.len() != 1 {
            return Err(ResampleError::ShapeMismatch {
                message: format!("scalar coordinate needs one value, got {}", values.len()),
            });
        }
        Ok(Self { dim: None, values })
    }

    /// Builds a coordinate along `dim` from group labels.
    pub fn from_labels(dim: impl Into<String>, labels: &[Label]) -> Result<Self> {
        Ok(Self::new(dim, CoordValues::from_labels(labels)?))
    }

    /// The dimension this coordinate runs along, `None` for scalars
    #[must_use]
    pub fn dim(&self) -> Option<&str> {
        self.dim.as_deref()
    }

    #[must_use]
    pub fn values(&self) -> &CoordValues {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.dim.is_none()
    }

    #[must_use]
    pub fn runs_along(&self, dim: &str) -> bool {
        self.dim.as_deref() == Some(dim)
    }

    /// All values as group labels.
    pub fn labels(&self) -> Result<Vec<Label>> {
        self.values.labels()
    }

    /// Datetime field access over the values.
    pub fn dt(&self) -> Result<DatetimeAccessor<'_>> {
        DatetimeAccessor::new(self)
    }

    /// Takes the values at `positions` along the coordinate's dimension.
    pub fn select(&self, positions: &[usize]) -> Result<Self> {
        Ok(Self {
            dim: self.dim.clone(),
            values: self.values.select(positions)?,
        })
    }

    /// Takes one value, turning the coordinate into a scalar.
    pub fn point(&self, index: usize) -> Result<Self> {
        Self::scalar(self.values.select(&[index])?)
    }

    pub(crate) fn from_parts(dim: Option<String>, values: CoordValues) -> Self {
        Self { dim, values }
    }

    pub(crate) fn with_dim(mut self, dim: Option<String>) -> Self {
        self.dim = dim;
        self
    }
}

/// Checks that a coordinate fits the dimension sizes of its container.
pub(crate) fn check_coordinate(name: &str, coord: &Coordinate, dim_len: Option<usize>) -> Result<()> {
    match (coord.dim(), dim_len) {
        (None, _) => Ok(()),
        (Some(dim), None) => Err(ResampleError::DimensionNotFound {
            var: name.to_string(),
            dim: dim.to_string(),
        }),
        (Some(dim), Some(len)) if len != coord.len() => Err(ResampleError::ShapeMismatch {
            message: format!(
                "coordinate '{name}' has {} values but dimension '{dim}' has length {len}",
                coord.len()
            ),
        }),
        _ => Ok(()),
    }
}

/// Renames `from` to `to` in coordinate names and coordinate dimensions.
pub(crate) fn rename_coords(coords: Coords, from: &str, to: &str) -> Coords {
    coords
        .into_iter()
        .map(|(name, coord)| {
            let name = if name == from { to.to_string() } else { name };
            let coord = if coord.runs_along(from) {
                coord.with_dim(Some(to.to_string()))
            } else {
                coord
            };
            (name, coord)
        })
        .collect()
}

/// Merges coordinates of pieces concatenated along the existing dimension `dim`.
///
/// Coordinates along `dim` are concatenated in piece order. Other coordinates
/// survive only when every piece carries an identical copy.
pub(crate) fn concat_coords(pieces: &[&Coords], dim: &str) -> Result<Coords> {
    let mut merged = Coords::new();
    let Some(first) = pieces.first() else {
        return Ok(merged);
    };

    for (name, coord) in first.iter() {
        let same: Option<Vec<&Coordinate>> = pieces.iter().map(|p| p.get(name)).collect();
        let Some(same) = same else {
            trace!(coord = %name, "dropping coordinate missing from some pieces");
            continue;
        };

        if coord.runs_along(dim) {
            if same.iter().any(|c| !c.runs_along(dim)) {
                return Err(ResampleError::IncompatibleDimensions {
                    message: format!("coordinate '{name}' does not run along '{dim}' in every piece"),
                });
            }
            let values: Vec<&CoordValues> = same.iter().map(|c| c.values()).collect();
            merged.insert(name.clone(), Coordinate::new(dim, CoordValues::concat(&values)?));
        } else if same.iter().all(|c| *c == coord) {
            merged.insert(name.clone(), coord.clone());
        } else {
            trace!(coord = %name, "dropping coordinate that differs between pieces");
        }
    }

    Ok(merged)
}

/// Merges coordinates of pieces stacked along the new dimension `new_dim`.
///
/// Scalar coordinates that differ between pieces become coordinates along
/// `new_dim`; `key_coord` indexes the new dimension.
pub(crate) fn stack_coords(pieces: &[&Coords], new_dim: &str, key_coord: Coordinate) -> Result<Coords> {
    let mut merged = Coords::new();
    if let Some(first) = pieces.first() {
        for (name, coord) in first.iter() {
            if name == new_dim {
                continue;
            }
            let same: Option<Vec<&Coordinate>> = pieces.iter().map(|p| p.get(name)).collect();
            let Some(same) = same else {
                trace!(coord = %name, "dropping coordinate missing from some pieces");
                continue;
            };

            if same.iter().all(|c| *c == coord) {
                merged.insert(name.clone(), coord.clone());
            } else if same.iter().all(|c| c.is_scalar()) {
                let values: Vec<&CoordValues> = same.iter().map(|c| c.values()).collect();
                merged.insert(name.clone(), Coordinate::new(new_dim, CoordValues::concat(&values)?));
            } else {
                trace!(coord = %name, "dropping coordinate that differs between pieces");
            }
        }
    }
    merged.insert(new_dim.to_string(), key_coord);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_order_by_value() {
        let mut labels = vec![Label::Int(3), Label::Int(-1), Label::Int(2)];
        labels.sort();
        assert_eq!(labels, vec![Label::Int(-1), Label::Int(2), Label::Int(3)]);
    }

    #[test]
    fn float_values_cannot_be_labels() {
        let values = CoordValues::Float(vec![0.5, 1.5]);
        match values.labels() {
            Err(ResampleError::UnsupportedGroupKey { kind }) => assert_eq!(kind, "float"),
            other => panic!("Expected UnsupportedGroupKey, got {:?}", other),
        }
    }

    #[test]
    fn mixed_labels_are_rejected() {
        let labels = vec![Label::Int(1), Label::from("a")];
        assert!(CoordValues::from_labels(&labels).is_err());
    }

    #[test]
    fn stacking_turns_differing_scalars_into_a_coordinate() -> Result<()> {
        let a: Coords = [("t".to_string(), Coordinate::scalar(CoordValues::Int(vec![1]))?)].into();
        let b: Coords = [("t".to_string(), Coordinate::scalar(CoordValues::Int(vec![5]))?)].into();
        let keys = Coordinate::new("g", CoordValues::Int(vec![0, 1]));

        let merged = stack_coords(&[&a, &b], "g", keys.clone())?;
        assert_eq!(merged["t"], Coordinate::new("g", CoordValues::Int(vec![1, 5])));
        assert_eq!(merged["g"], keys);
        Ok(())
    }

    #[test]
    fn concatenation_joins_coordinates_along_the_dimension() -> Result<()> {
        let a: Coords = [("x".to_string(), Coordinate::new("x", CoordValues::Int(vec![0, 1])))].into();
        let b: Coords = [("x".to_string(), Coordinate::new("x", CoordValues::Int(vec![2])))].into();

        let merged = concat_coords(&[&a, &b], "x")?;
        assert_eq!(merged["x"], Coordinate::new("x", CoordValues::Int(vec![0, 1, 2])));
        Ok(())
    }
}
