/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod error;
pub mod graphs;
pub mod matrix;
pub mod rank;

#[cfg(feature = "cli")]
pub mod cli;

pub mod prelude {
    pub use crate::error::RankError;
    pub use crate::graphs::Adjacency;
    pub use crate::matrix::{dangling_mask, CscMatrix, TransitionMatrix};
    pub use crate::rank::observer::*;
    pub use crate::rank::preds::*;
    pub use crate::rank::{l1_distance, top_k, PowerIteration};
}
