/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use thiserror::Error;

/// Errors raised by the transition-matrix builder and the power-iteration
/// engine.
///
/// Structural errors ([`NotSquare`](RankError::NotSquare),
/// [`DimensionMismatch`](RankError::DimensionMismatch),
/// [`MalformedMatrix`](RankError::MalformedMatrix)) are detected before any
/// iteration takes place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankError {
    /// The adjacency matrix is not square.
    #[error("The matrix is not square: {rows} rows, {cols} columns")]
    NotSquare { rows: usize, cols: usize },

    /// A vector does not match the dimension of the matrix.
    #[error("The {what} has length {found}, but the matrix has dimension {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The compressed arrays do not describe a valid sparse matrix.
    #[error("Malformed sparse matrix: {0}")]
    MalformedMatrix(String),

    /// A numeric parameter is outside its domain.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The iteration cap was reached before the error fell below the
    /// threshold.
    #[error("No convergence after {iterations} iterations (error {error})")]
    NonConvergence { iterations: usize, error: f64 },
}
