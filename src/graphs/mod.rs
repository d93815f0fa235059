/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Readers producing the adjacency matrix of a graph.

pub mod adjlist;
pub use adjlist::Adjacency;
