//! Region × type stratum grid.
//!
//! Strata are laid out region-major, type-minor: cell `(r, t)` lives at flat
//! index `r * types + t`. The calculator consumes the flat view and the
//! report re-shapes its per-stratum output onto the same axes.

use serde::Serialize;
use thiserror::Error;

/// Grid construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Value count does not match `regions × types`.
    #[error("grid expects {expected} cells ({regions} regions × {types} types), got {actual}")]
    ShapeMismatch {
        /// Number of regions.
        regions: usize,
        /// Number of types.
        types: usize,
        /// `regions * types`.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },
}

/// Identifies one stratum by its axis labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StratumId {
    /// Region name.
    pub region: String,
    /// Type name.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Values laid out on named region and type axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StratumGrid<T> {
    regions: Vec<String>,
    types: Vec<String>,
    values: Vec<T>,
}

impl<T> StratumGrid<T> {
    /// Build a grid from axis names and region-major values.
    pub fn new(regions: Vec<String>, types: Vec<String>, values: Vec<T>) -> Result<Self, GridError> {
        let expected = regions.len() * types.len();
        if values.len() != expected {
            return Err(GridError::ShapeMismatch {
                regions: regions.len(),
                types: types.len(),
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            regions,
            types,
            values,
        })
    }

    /// Region axis labels.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Type axis labels.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Number of strata.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when either axis is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(regions, types)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.regions.len(), self.types.len())
    }

    #[inline]
    fn index(&self, region: usize, kind: usize) -> Option<usize> {
        (region < self.regions.len() && kind < self.types.len())
            .then(|| region * self.types.len() + kind)
    }

    /// Value at `(region, kind)`.
    pub fn get(&self, region: usize, kind: usize) -> Option<&T> {
        self.index(region, kind).map(|i| &self.values[i])
    }

    /// Flat region-major view.
    pub fn as_flat(&self) -> &[T] {
        &self.values
    }

    /// One slice per region.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics; an empty type axis means no cells anyway.
        self.values.chunks(self.types.len().max(1))
    }

    /// Labels of flat index `index`.
    pub fn stratum_id(&self, index: usize) -> Option<StratumId> {
        if index >= self.values.len() {
            return None;
        }
        let width = self.types.len();
        Some(StratumId {
            region: self.regions[index / width].clone(),
            kind: self.types[index % width].clone(),
        })
    }

    /// Same axes, new region-major values.
    pub fn reshape<U>(&self, values: Vec<U>) -> Result<StratumGrid<U>, GridError> {
        StratumGrid::new(self.regions.clone(), self.types.clone(), values)
    }
}

impl<T: Clone> StratumGrid<T> {
    /// Grid with every cell set to `value`.
    pub fn filled(regions: Vec<String>, types: Vec<String>, value: T) -> Self {
        let cells = regions.len() * types.len();
        Self {
            regions,
            types,
            values: vec![value; cells],
        }
    }

    /// Build from nested rows (`rows[region][type]`).
    pub fn from_rows(
        regions: Vec<String>,
        types: Vec<String>,
        rows: &[Vec<T>],
    ) -> Result<Self, GridError> {
        let width = types.len();
        let ragged = rows.len() != regions.len() || rows.iter().any(|row| row.len() != width);
        if ragged {
            return Err(GridError::ShapeMismatch {
                regions: regions.len(),
                types: width,
                expected: regions.len() * width,
                actual: rows.iter().map(Vec::len).sum(),
            });
        }
        let values = rows.iter().flatten().cloned().collect();
        Self::new(regions, types, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn region_major_layout() {
        let grid = StratumGrid::new(names("r", 2), names("t", 3), vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.get(0, 2), Some(&3));
        assert_eq!(grid.get(1, 0), Some(&4));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.rows().collect::<Vec<_>>(), vec![&[1, 2, 3][..], &[4, 5, 6][..]]);
    }

    #[test]
    fn shape_mismatch_rejected() {
        let err = StratumGrid::new(names("r", 2), names("t", 2), vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::ShapeMismatch {
                regions: 2,
                types: 2,
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows = vec![vec![1, 2], vec![3]];
        assert!(StratumGrid::from_rows(names("r", 2), names("t", 2), &rows).is_err());
    }

    #[test]
    fn stratum_id_names_flat_index() {
        let grid = StratumGrid::from_rows(names("r", 2), names("t", 2), &[vec![1, 2], vec![3, 4]])
            .unwrap();
        assert_eq!(
            grid.stratum_id(3),
            Some(StratumId {
                region: "r2".into(),
                kind: "t2".into()
            })
        );
        assert_eq!(
            grid.stratum_id(1),
            Some(StratumId {
                region: "r1".into(),
                kind: "t2".into()
            })
        );
        assert_eq!(grid.stratum_id(4), None);
    }

    #[test]
    fn filled_and_reshape() {
        let grid = StratumGrid::filled(names("r", 1), names("t", 2), 7u64);
        assert_eq!(grid.as_flat(), &[7, 7]);
        let halves = grid.reshape(vec![0.5, 1.5]).unwrap();
        assert_eq!(halves.regions(), grid.regions());
        assert_eq!(halves.get(0, 1), Some(&1.5));
    }
}
