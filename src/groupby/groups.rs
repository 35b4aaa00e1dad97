//! Partitioning of positions by group label

use crate::coords::{Coordinate, Label};
use crate::errors::{Result, ResampleError};
use std::collections::BTreeMap;

/// Positions of each group along the grouped dimension, in sorted key order
#[derive(Debug, Clone, PartialEq)]
pub struct Groups {
    keys: Vec<Label>,
    positions: Vec<Vec<usize>>,
}

impl Groups {
    /// Builds groups from one label per position along `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`ResampleError::EmptyGroups`] when `labels` is empty.
    pub fn from_labels(dim: &str, labels: &[Label]) -> Result<Self> {
        let mut grouped: BTreeMap<&Label, Vec<usize>> = BTreeMap::new();
        for (position, label) in labels.iter().enumerate() {
            grouped.entry(label).or_default().push(position);
        }
        if grouped.is_empty() {
            return Err(ResampleError::EmptyGroups { dim: dim.to_string() });
        }

        let (keys, positions): (Vec<Label>, Vec<Vec<usize>>) = grouped
            .into_iter()
            .map(|(key, positions)| (key.clone(), positions))
            .unzip();
        Ok(Self { keys, positions })
    }

    #[must_use]
    pub fn keys(&self) -> &[Label] {
        &self.keys
    }

    #[must_use]
    pub fn positions(&self) -> &[Vec<usize>] {
        &self.positions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `(key, positions)` pairs in iteration order
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &[usize])> {
        self.keys.iter().zip(self.positions.iter().map(Vec::as_slice))
    }

    /// Every position in group order.
    #[must_use]
    pub fn flat_positions(&self) -> Vec<usize> {
        self.positions.iter().flatten().copied().collect()
    }

    /// The group keys as a coordinate along `dim`.
    pub fn key_coordinate(&self, dim: &str) -> Result<Coordinate> {
        Coordinate::from_labels(dim, &self.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_sorted_by_key() {
        let labels: Vec<Label> = ["b", "a", "b", "c", "a"].iter().map(|&s| s.into()).collect();
        let groups = Groups::from_labels("time", &labels).unwrap();
        assert_eq!(groups.keys(), &[Label::from("a"), Label::from("b"), Label::from("c")]);
        assert_eq!(groups.positions(), &[vec![1, 4], vec![0, 2], vec![3]]);
        assert_eq!(groups.flat_positions(), vec![1, 4, 0, 2, 3]);
    }

    #[test]
    fn empty_labels_are_rejected() {
        match Groups::from_labels("time", &[]) {
            Err(ResampleError::EmptyGroups { dim }) => assert_eq!(dim, "time"),
            other => panic!("Expected EmptyGroups, got {:?}", other),
        }
    }
}
