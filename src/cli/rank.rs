/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::build::load_or_build;
use super::{cache_paths, load_labels, positive_parser, FloatVectorFormat, GlobalArgs};
use crate::rank::observer::LogObserver;
use crate::rank::{preds::L1Norm, top_k, PowerIteration};
use anyhow::{Context, Result};
use clap::Parser;
use dsi_progress_logger::{progress_logger, ProgressLog};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    about = "Compute PageRank of a graph in adjacency-list format by power iteration.",
    long_about = "Compute PageRank of a graph in adjacency-list format by power iteration. The transition matrix is cached next to the graph (extension .csc), together with the node labels (extension .nodes); the ranking is stored next to the graph (extension .ranks) and used as a starting point by later runs."
)]
pub struct CliArgs {
    /// The graph, in adjacency-list format (extension .adjlist).
    pub graph: PathBuf,

    #[arg(conflicts_with = "threshold")]
    /// The exponent of the error tolerance: the iteration stops when the ℓ₁
    /// distance between successive approximations is at most 10^(-TOL).
    pub tol: Option<u32>,

    #[arg(short, long)]
    /// The ℓ₁ error threshold to stop (default: 1E-6).
    pub threshold: Option<f64>,

    #[arg(short, long, default_value_t = PowerIteration::DEFAULT_ALPHA)]
    /// The damping factor α, that is, the teleportation probability (must be
    /// in the interval [0 . . 1)).
    pub alpha: f64,

    #[arg(long, value_parser = positive_parser)]
    /// Maximum number of iterations; if reached before convergence the last
    /// approximation is stored anyway and an error is reported.
    pub max_iter: Option<usize>,

    #[arg(short = 'k', long, default_value_t = 25)]
    /// How many of the highest-ranked nodes to print.
    pub top: usize,

    #[arg(long, default_value_t = PowerIteration::DEFAULT_LOG_EVERY, value_parser = positive_parser)]
    /// Log the error every this many iterations.
    pub log_every: usize,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Java)]
    /// The format of the stored ranking.
    pub fmt: FloatVectorFormat,

    #[arg(long)]
    /// Decimal digits for text output formats.
    pub precision: Option<usize>,

    #[arg(long)]
    /// Neither read nor write the cached matrix and ranking.
    pub no_cache: bool,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let (_, ranks_path, nodes_path) = cache_paths(&args.graph)?;
    let threshold = match args.tol {
        Some(exp) => L1Norm::from_exponent(exp)?,
        None => L1Norm::try_from(args.threshold)?,
    };

    log::info!("Running PageRank on {}", args.graph.display());
    log::info!("Error tolerance: {}", threshold.threshold());

    let (transition, labels) = load_or_build(&global_args, &args.graph, !args.no_cache)?;
    log::info!(
        "Number of all-zero columns: {}",
        transition.num_dangling()
    );

    let start = if args.no_cache {
        None
    } else {
        match args.fmt.load(&ranks_path) {
            Ok(start) => Some(start),
            Err(e) => {
                log::info!("Cannot load ranking: {:#}", e);
                None
            }
        }
    };

    let mut pl = progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let mut pr = PowerIteration::new(&transition);
    pr.alpha(args.alpha)?
        .start(start.as_deref())
        .max_iter(args.max_iter)
        .log_every(args.log_every);

    let outcome = pr.run_with_logging(threshold, &mut pl, &mut LogObserver);

    log::info!(
        "Completed after {} iteration(s), error = {}",
        pr.iterations(),
        pr.error()
    );

    if !args.no_cache {
        args.fmt.store(&ranks_path, pr.rank(), args.precision)?;
    }
    outcome.context("The ranking was stored, but it did not converge")?;

    let labels = match labels {
        Some(labels) => Some(labels),
        None if nodes_path.exists() => Some(load_labels(&nodes_path)?),
        None => None,
    }
    .filter(|labels| labels.len() == pr.rank().len());

    let top = top_k(pr.rank(), args.top);
    log::info!("Printing top {} nodes", top.len());
    for (node, value) in top {
        match &labels {
            Some(labels) => println!("{}\t{}", labels[node], value),
            None => println!("{}\t{}", node, value),
        }
    }

    Ok(())
}
