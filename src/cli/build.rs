/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{cache_paths, load_matrix, store_labels, store_matrix, GlobalArgs};
use crate::graphs::Adjacency;
use crate::matrix::TransitionMatrix;
use anyhow::{Context, Result};
use clap::Parser;
use dsi_progress_logger::{progress_logger, ProgressLog};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Graphs with at most this many nodes have their matrices printed at
/// debug level.
const MAX_PRINTED_NODES: usize = 20;

#[derive(Parser, Debug)]
#[command(
    about = "Build the transition matrix of a graph in adjacency-list format and cache it next to the graph, together with the list of node labels.",
    long_about = None
)]
pub struct CliArgs {
    /// The graph, in adjacency-list format (extension .adjlist).
    pub graph: PathBuf,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let (matrix_path, _, nodes_path) = cache_paths(&args.graph)?;
    let (transition, labels) = build_transition(&global_args, &args.graph)?;
    store_matrix(&matrix_path, transition.matrix())?;
    store_labels(&nodes_path, &labels)?;
    Ok(())
}

/// Reads a graph and builds its transition matrix, returning it with the
/// node labels.
pub fn build_transition(
    global_args: &GlobalArgs,
    graph: impl AsRef<Path>,
) -> Result<(TransitionMatrix, Vec<String>)> {
    let graph = graph.as_ref();
    let mut pl = progress_logger![display_memory = true];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    log::info!("Reading graph from {}", graph.display());
    let adjacency = std::fs::File::open(graph)
        .with_context(|| format!("Could not open {}", graph.display()))
        .and_then(|file| Adjacency::read(BufReader::new(file), &mut pl))
        .with_context(|| format!("Could not read graph from {}", graph.display()))?;
    log::info!("Number of nodes: {}", adjacency.num_nodes());
    log::info!("Number of arcs: {}", adjacency.num_arcs());

    let (labels, adjacency) = adjacency.into_parts();
    log::info!(
        "Approximate matrix size: {}MB",
        (adjacency.size_in_bytes() as f64 / 1E6).round()
    );
    if adjacency.num_cols() <= MAX_PRINTED_NODES {
        log::debug!("Adjacency matrix: {:?}", adjacency.to_dense());
    }

    log::info!("Normalizing the matrix to make it column-stochastic...");
    let transition = TransitionMatrix::build(adjacency)?;
    if transition.num_nodes() <= MAX_PRINTED_NODES {
        log::debug!("Transition matrix: {:?}", transition.matrix().to_dense());
    }

    Ok((transition, labels))
}

/// Returns the transition matrix of a graph, using the cached matrix if
/// possible.
///
/// If `use_cache` is true and the cached matrix can be loaded, the graph is
/// not read at all, and no labels are returned. Otherwise, the matrix is
/// built from the graph and returned with the node labels; if `use_cache` is
/// true, both are also stored in the cache.
pub fn load_or_build(
    global_args: &GlobalArgs,
    graph: impl AsRef<Path>,
    use_cache: bool,
) -> Result<(TransitionMatrix, Option<Vec<String>>)> {
    let (matrix_path, _, nodes_path) = cache_paths(&graph)?;

    if use_cache {
        match load_matrix(&matrix_path) {
            Ok(matrix) => return Ok((TransitionMatrix::from_stochastic(matrix)?, None)),
            Err(e) => log::info!("Cannot load cached matrix: {:#}", e),
        }
    }

    let (transition, labels) = build_transition(global_args, &graph)?;
    if use_cache {
        store_matrix(&matrix_path, transition.matrix())?;
        store_labels(&nodes_path, &labels)?;
    }
    Ok((transition, Some(labels)))
}
