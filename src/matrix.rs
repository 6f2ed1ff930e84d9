//! Dense row-major probability matrix
//!
//! One `ProbMatrix` holds a single classifier's output: one row per sample,
//! one column per class. Uncertainty inputs reuse the same type with a
//! single column.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// Row-major `nrows x ncols` matrix of `f64`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct ProbMatrix {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

impl ProbMatrix {
    /// Zero-filled matrix
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            data: vec![0.0; nrows * ncols],
        }
    }

    /// Build from a list of rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(nrows * ncols);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != ncols {
                return Err(Error::RaggedRows {
                    row: i,
                    expected: ncols,
                    actual: row.len(),
                });
            }
            data.extend(row);
        }

        Ok(Self { nrows, ncols, data })
    }

    /// Single-column matrix, e.g. one classifier's per-sample uncertainty
    pub fn from_column(values: Vec<f64>) -> Self {
        Self {
            nrows: values.len(),
            ncols: 1,
            data: values,
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(nrows, ncols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.nrows && col < self.ncols {
            Some(self.data[row * self.ncols + col])
        } else {
            None
        }
    }

    /// Borrow one row
    ///
    /// # Panics
    /// Panics if `row >= nrows`.
    pub fn row(&self, row: usize) -> &[f64] {
        assert!(row < self.nrows, "row {} out of range for {} rows", row, self.nrows);
        &self.data[row * self.ncols..(row + 1) * self.ncols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics, and a zero-column matrix still has rows
        (0..self.nrows).map(move |i| self.row(i))
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(|r| r.to_vec()).collect()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// True when no cell is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        row * self.ncols + col
    }
}

impl Index<(usize, usize)> for ProbMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[self.offset(row, col)]
    }
}

impl IndexMut<(usize, usize)> for ProbMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        let offset = self.offset(row, col);
        &mut self.data[offset]
    }
}

impl TryFrom<Vec<Vec<f64>>> for ProbMatrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<ProbMatrix> for Vec<Vec<f64>> {
    fn from(matrix: ProbMatrix) -> Self {
        matrix.to_rows()
    }
}
