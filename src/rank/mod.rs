/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Ranking algorithms and their diagnostics.

pub mod observer;
pub mod power;
pub use power::{l1_distance, preds, PowerIteration};

mod topk;
pub use topk::top_k;
