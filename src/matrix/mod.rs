/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Sparse matrices.

mod csc;
pub use csc::CscMatrix;

pub mod transition;
pub use transition::{dangling_mask, TransitionMatrix};
