/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::RankError;
use epserde::Epserde;

/// A Compressed Sparse Column (CSC) matrix of doubles.
///
/// Column *j* is stored as the slice of row indices
/// `row_indices[col_ptrs[j]..col_ptrs[j + 1]]` and the matching slice of
/// values. Row indices within a column are strictly increasing. Columns can
/// only be appended.
///
/// This struct can be serialized with
/// [ε-serde](https://crates.io/crates/epserde).
#[derive(Epserde, Debug, Clone, PartialEq)]
pub struct CscMatrix {
    num_rows: usize,
    /// The first pointer is always zero, and there is one more pointer than
    /// the number of columns.
    col_ptrs: Vec<usize>,
    row_indices: Vec<usize>,
    values: Vec<f64>,
}

impl CscMatrix {
    /// Creates a matrix with `num_rows` rows and no columns.
    pub fn new(num_rows: usize) -> Self {
        Self {
            num_rows,
            col_ptrs: vec![0],
            row_indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates the 0/1 adjacency matrix of a graph with `n` nodes from a list
    /// of arcs (source, target).
    ///
    /// Column *j* contains the targets of node *j*. Duplicate arcs collapse
    /// into a single entry.
    ///
    /// # Panics
    ///
    /// Panics if an arc mentions a node not smaller than `n`.
    pub fn from_arcs(n: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut succ = vec![Vec::new(); n];
        for (src, dst) in arcs {
            assert!(
                src < n && dst < n,
                "Arc ({src}, {dst}) out of bounds for {n} nodes"
            );
            succ[src].push(dst);
        }

        let mut matrix = Self::new(n);
        for mut targets in succ {
            targets.sort_unstable();
            targets.dedup();
            matrix.push(targets.into_iter().map(|row| (row, 1.0)));
        }
        matrix
    }

    /// Creates a matrix from its compressed arrays, checking that they are
    /// consistent.
    pub fn from_parts(
        num_rows: usize,
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self, RankError> {
        let malformed = |reason: String| Err(RankError::MalformedMatrix(reason));

        if col_ptrs.first() != Some(&0) {
            return malformed("the column pointers must start with 0".into());
        }
        if row_indices.len() != values.len() {
            return malformed(format!(
                "{} row indices but {} values",
                row_indices.len(),
                values.len()
            ));
        }
        if col_ptrs.last() != Some(&row_indices.len()) {
            return malformed(format!(
                "the last column pointer should be {}",
                row_indices.len()
            ));
        }
        for (j, w) in col_ptrs.windows(2).enumerate() {
            if w[0] > w[1] {
                return malformed(format!("decreasing column pointers at column {j}"));
            }
            let rows = &row_indices[w[0]..w[1]];
            if let Some(&row) = rows.iter().find(|&&row| row >= num_rows) {
                return malformed(format!(
                    "row index {row} in column {j} out of bounds for {num_rows} rows"
                ));
            }
            if rows.windows(2).any(|r| r[0] >= r[1]) {
                return malformed(format!("unsorted or repeated row indices in column {j}"));
            }
        }

        Ok(Self {
            num_rows,
            col_ptrs,
            row_indices,
            values,
        })
    }

    /// Appends a column given as (row, value) pairs in increasing row order.
    pub fn push(&mut self, entries: impl IntoIterator<Item = (usize, f64)>) {
        for (row, value) in entries {
            debug_assert!(row < self.num_rows);
            debug_assert!(
                self.row_indices.len() == *self.col_ptrs.last().unwrap_or(&0)
                    || self.row_indices.last().is_some_and(|&last| last < row)
            );
            self.row_indices.push(row);
            self.values.push(value);
        }
        self.col_ptrs.push(self.row_indices.len());
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the number of columns.
    pub fn num_cols(&self) -> usize {
        self.col_ptrs.len() - 1
    }

    /// Returns the number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn is_square(&self) -> bool {
        self.num_rows == self.num_cols()
    }

    /// Returns the number of stored entries of column `col`.
    pub fn column_nnz(&self, col: usize) -> usize {
        self.col_ptrs[col + 1] - self.col_ptrs[col]
    }

    /// Returns the row indices and the values of column `col`.
    pub fn column(&self, col: usize) -> (&[usize], &[f64]) {
        let range = self.col_ptrs[col]..self.col_ptrs[col + 1];
        (&self.row_indices[range.clone()], &self.values[range])
    }

    /// Returns a mutable view of the values of column `col`.
    pub(crate) fn column_values_mut(&mut self, col: usize) -> &mut [f64] {
        let range = self.col_ptrs[col]..self.col_ptrs[col + 1];
        &mut self.values[range]
    }

    pub fn col_ptrs(&self) -> &[usize] {
        &self.col_ptrs
    }

    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the sum of the values of each column.
    pub fn column_sums(&self) -> Vec<f64> {
        (0..self.num_cols())
            .map(|col| self.column(col).1.iter().sum())
            .collect()
    }

    /// Stores in `out` the product of this matrix and `v`.
    ///
    /// The product scatters each column, so it takes time proportional to the
    /// number of stored entries plus the number of rows.
    ///
    /// # Panics
    ///
    /// Panics if `v` or `out` do not have the right length.
    pub fn mul_vec_into(&self, v: &[f64], out: &mut [f64]) {
        assert_eq!(v.len(), self.num_cols());
        assert_eq!(out.len(), self.num_rows);
        out.fill(0.0);
        for (col, &x) in v.iter().enumerate() {
            if x == 0.0 {
                continue;
            }
            let (rows, values) = self.column(col);
            for (&row, &value) in rows.iter().zip(values) {
                out[row] += value * x;
            }
        }
    }

    /// Returns the product of this matrix and `v`.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.num_rows];
        self.mul_vec_into(v, &mut out);
        out
    }

    /// Returns a dense row-major copy of the matrix, for debugging small
    /// instances.
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        let mut dense = vec![vec![0.0; self.num_cols()]; self.num_rows];
        for col in 0..self.num_cols() {
            let (rows, values) = self.column(col);
            for (&row, &value) in rows.iter().zip(values) {
                dense[row][col] = value;
            }
        }
        dense
    }

    /// Approximate heap size in bytes of the compressed arrays.
    pub fn size_in_bytes(&self) -> usize {
        std::mem::size_of_val(self.col_ptrs.as_slice())
            + std::mem::size_of_val(self.row_indices.as_slice())
            + std::mem::size_of_val(self.values.as_slice())
    }

    /// Returns the compressed arrays: number of rows, column pointers, row
    /// indices, and values.
    pub fn into_parts(self) -> (usize, Vec<usize>, Vec<usize>, Vec<f64>) {
        (self.num_rows, self.col_ptrs, self.row_indices, self.values)
    }
}
