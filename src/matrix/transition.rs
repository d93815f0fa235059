/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Column-stochastic transition matrices.
//!
//! The transition matrix of a graph with *n* nodes is the *n* × *n* matrix *A*
//! in which column *j* describes how node *j* spreads its rank: if *j* has
//! outdegree *d* > 0, then *aᵢⱼ* = 1/*d* for every successor *i* of *j*.
//! Nodes with no successors (_dangling_ nodes) have an all-zero column, and
//! they are recorded in a boolean mask that travels with the matrix, so that
//! the [power iteration](crate::rank::power) can redistribute their rank.
//!
//! More generally, [`TransitionMatrix::build`] normalizes each nonempty column
//! of an arbitrary (possibly weighted) adjacency matrix to unit 𝓁₁ norm.

use crate::error::RankError;
use crate::matrix::CscMatrix;

/// A column-stochastic matrix paired with its dangling-column mask.
///
/// The mask is a projection of the matrix: it is computed when the pair is
/// created and cannot be modified independently.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    matrix: CscMatrix,
    dangling: Box<[bool]>,
}

/// Returns a mask that is true exactly for the columns of `matrix` with no
/// stored entries.
pub fn dangling_mask(matrix: &CscMatrix) -> Box<[bool]> {
    matrix
        .col_ptrs()
        .windows(2)
        .map(|w| w[0] == w[1])
        .collect()
}

fn check_square(matrix: &CscMatrix) -> Result<(), RankError> {
    if matrix.is_square() {
        Ok(())
    } else {
        Err(RankError::NotSquare {
            rows: matrix.num_rows(),
            cols: matrix.num_cols(),
        })
    }
}

impl TransitionMatrix {
    /// Builds a transition matrix from an adjacency matrix whose column *j*
    /// contains the successors of node *j*.
    ///
    /// Each column with stored entries is divided by the sum of the absolute
    /// values of its entries. Columns are normalized independently. A column
    /// whose entries are all zero is left untouched.
    pub fn build(mut adjacency: CscMatrix) -> Result<Self, RankError> {
        check_square(&adjacency)?;

        for col in 0..adjacency.num_cols() {
            let values = adjacency.column_values_mut(col);
            let norm: f64 = values.iter().map(|x| x.abs()).sum();
            if norm != 0.0 {
                for x in values.iter_mut() {
                    *x /= norm;
                }
            }
        }

        let dangling = dangling_mask(&adjacency);
        Ok(Self {
            matrix: adjacency,
            dangling,
        })
    }

    /// Wraps a matrix that is already column-stochastic, such as one loaded
    /// from a cache, recomputing its dangling mask.
    pub fn from_stochastic(matrix: CscMatrix) -> Result<Self, RankError> {
        check_square(&matrix)?;
        let dangling = dangling_mask(&matrix);
        Ok(Self { matrix, dangling })
    }

    pub fn matrix(&self) -> &CscMatrix {
        &self.matrix
    }

    pub fn dangling(&self) -> &[bool] {
        &self.dangling
    }

    /// Returns the number of nodes, that is, the dimension of the matrix.
    pub fn num_nodes(&self) -> usize {
        self.matrix.num_cols()
    }

    pub fn num_dangling(&self) -> usize {
        self.dangling.iter().filter(|&&d| d).count()
    }

    pub fn into_inner(self) -> (CscMatrix, Box<[bool]>) {
        (self.matrix, self.dangling)
    }
}
