/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Command-line interface.
//!
//! The `rank` command reproduces the usual workflow: the transition matrix of
//! a graph in adjacency-list format is cached next to the graph, and so is
//! the resulting ranking, which is used as a starting point by the next run.

use anyhow::{anyhow, bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use epserde::prelude::*;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::matrix::CscMatrix;

pub mod build;
pub mod rank;

pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    pub fn version_string() -> String {
        format!(
            "{}
build info: built on {} for {} with {}",
            PKG_VERSION, BUILT_TIME_UTC, TARGET, RUSTC_VERSION
        )
    }
}

/// Extension of cached transition matrices.
pub const MATRIX_EXTENSION: &str = "csc";
/// Extension of cached rankings.
pub const RANKS_EXTENSION: &str = "ranks";
/// Extension of node-label lists.
pub const NODES_EXTENSION: &str = "nodes";
/// Extension of graphs in adjacency-list format.
pub const ADJLIST_EXTENSION: &str = "adjlist";

#[derive(Debug, Clone, Copy, ValueEnum)]
/// Formats for storing and loading vectors of doubles.
pub enum FloatVectorFormat {
    /// Java-compatible format: a sequence of big-endian doubles.
    Java,
    /// ASCII format, one double per line.
    Ascii,
    /// A JSON Array.
    Json,
}

impl FloatVectorFormat {
    /// Stores values in the specified `path` using the format defined by
    /// `self`.
    ///
    /// If the result is a textual format, that is, ASCII or JSON, `precision`
    /// will be used to truncate the values to the specified number of decimal
    /// digits. If `None`, the shortest representation that reads back to the
    /// same value is used.
    pub fn store(&self, path: impl AsRef<Path>, values: &[f64], precision: Option<usize>) -> Result<()> {
        create_parent_dir(&path)?;
        let path_display = path.as_ref().display();
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Could not create vector at {}", path_display))?;
        let mut file = BufWriter::new(file);
        let fmt = |x: f64| match precision {
            None => format!("{x}"),
            Some(precision) => format!("{x:.precision$}"),
        };

        match self {
            FloatVectorFormat::Java => {
                log::info!("Storing in Java format at {}", path_display);
                for x in values {
                    file.write_all(&x.to_be_bytes())
                        .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
            }
            FloatVectorFormat::Ascii => {
                log::info!("Storing in ASCII format at {}", path_display);
                for &x in values {
                    writeln!(file, "{}", fmt(x))
                        .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
            }
            FloatVectorFormat::Json => {
                log::info!("Storing in JSON format at {}", path_display);
                let body = values.iter().map(|&x| fmt(x)).collect::<Vec<_>>().join(", ");
                write!(file, "[{body}]")
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
            }
        }

        file.flush()
            .with_context(|| format!("Could not write vector to {}", path_display))?;
        Ok(())
    }

    /// Loads values from the specified `path` using the format defined by
    /// `self`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<f64>> {
        let path = path.as_ref();
        let path_display = path.display();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Could not open {}", path_display))?;

        match self {
            FloatVectorFormat::Java => {
                log::info!("Loading Java format from {}", path_display);
                let file_len = file.metadata()?.len() as usize;
                let byte_size = size_of::<f64>();
                ensure!(
                    file_len % byte_size == 0,
                    "File size ({}) is not a multiple of {} bytes",
                    file_len,
                    byte_size
                );
                let n = file_len / byte_size;
                let mut reader = BufReader::new(file);
                let mut result = Vec::with_capacity(n);
                let mut buf = [0u8; 8];
                for i in 0..n {
                    reader.read_exact(&mut buf).with_context(|| {
                        format!("Could not read value at index {i} from {}", path_display)
                    })?;
                    result.push(f64::from_be_bytes(buf));
                }
                Ok(result)
            }
            FloatVectorFormat::Ascii => {
                log::info!("Loading ASCII format from {}", path_display);
                BufReader::new(file)
                    .lines()
                    .enumerate()
                    .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
                    .map(|(i, line)| {
                        let line = line.with_context(|| {
                            format!("Error reading line {} of {}", i + 1, path_display)
                        })?;
                        line.trim().parse::<f64>().map_err(|e| {
                            anyhow!("Error parsing line {} of {}: {}", i + 1, path_display, e)
                        })
                    })
                    .collect()
            }
            FloatVectorFormat::Json => {
                log::info!("Loading JSON format from {}", path_display);
                let mut text = String::new();
                BufReader::new(file)
                    .read_to_string(&mut text)
                    .with_context(|| format!("Could not read {}", path_display))?;
                let Some(body) = text
                    .trim()
                    .strip_prefix('[')
                    .and_then(|t| t.strip_suffix(']'))
                else {
                    bail!("Expected a JSON array in {}", path_display);
                };
                if body.trim().is_empty() {
                    return Ok(Vec::new());
                }
                body.split(',')
                    .enumerate()
                    .map(|(i, token)| {
                        token.trim().parse::<f64>().map_err(|e| {
                            anyhow!("Error parsing element {} of {}: {}", i + 1, path_display, e)
                        })
                    })
                    .collect()
            }
        }
    }
}

/// Stores a transition matrix using ε-serde.
pub fn store_matrix(path: impl AsRef<Path>, matrix: &CscMatrix) -> Result<()> {
    create_parent_dir(&path)?;
    let path_display = path.as_ref().display();
    log::info!("Storing matrix at {}", path_display);
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Could not create matrix file {}", path_display))?;
    let mut file = BufWriter::new(file);
    matrix
        .serialize(&mut file)
        .with_context(|| format!("Could not write matrix to {}", path_display))?;
    file.flush()
        .with_context(|| format!("Could not write matrix to {}", path_display))?;
    Ok(())
}

/// Loads a transition matrix stored by [`store_matrix`], checking its
/// structure.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<CscMatrix> {
    let path_display = path.as_ref().display();
    log::info!("Loading matrix from {}", path_display);
    let matrix = CscMatrix::load_full(path.as_ref())
        .with_context(|| format!("Could not load matrix from {}", path_display))?;
    let (num_rows, col_ptrs, row_indices, values) = matrix.into_parts();
    CscMatrix::from_parts(num_rows, col_ptrs, row_indices, values)
        .with_context(|| format!("Invalid matrix in {}", path_display))
}

/// Stores node labels, one per line.
pub fn store_labels(path: impl AsRef<Path>, labels: &[String]) -> Result<()> {
    create_parent_dir(&path)?;
    let path_display = path.as_ref().display();
    log::info!("Storing node labels at {}", path_display);
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Could not create {}", path_display))?;
    let mut file = BufWriter::new(file);
    for label in labels {
        writeln!(file, "{label}").with_context(|| format!("Could not write to {}", path_display))?;
    }
    file.flush()
        .with_context(|| format!("Could not write to {}", path_display))?;
    Ok(())
}

/// Loads node labels stored by [`store_labels`].
pub fn load_labels(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path_display = path.as_ref().display();
    let file = std::fs::File::open(&path)
        .with_context(|| format!("Could not open {}", path_display))?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Could not read labels from {}", path_display))
}

/// Checks that `graph` has the adjacency-list extension and returns the paths
/// of the matrix, ranking, and label files that live next to it.
pub fn cache_paths(graph: impl AsRef<Path>) -> Result<(PathBuf, PathBuf, PathBuf)> {
    let graph = graph.as_ref();
    ensure!(
        graph.extension().is_some_and(|ext| ext == ADJLIST_EXTENSION),
        "The graph file {} must have extension .{}",
        graph.display(),
        ADJLIST_EXTENSION
    );
    Ok((
        graph.with_extension(MATRIX_EXTENSION),
        graph.with_extension(RANKS_EXTENSION),
        graph.with_extension(NODES_EXTENSION),
    ))
}

/// Creates the directory that will contain `file_path`, if needed.
pub fn create_parent_dir(file_path: impl AsRef<Path>) -> Result<()> {
    match file_path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create directory {}", dir.display())),
        _ => Ok(()),
    }
}

/// Parses a strictly positive integer.
///
/// This function is meant to be used with `#[arg(..., value_parser =
/// positive_parser)]`.
pub fn positive_parser(arg: &str) -> Result<usize> {
    let value = arg.parse::<usize>()?;
    ensure!(value > 0, "The value must be greater than 0");
    Ok(value)
}

/// Parses a duration such as `1d2h3m4s567`.
///
/// Each number is followed by a unit among `d`, `h`, `m`, and `s`; a
/// trailing number without unit counts milliseconds. Whitespace is ignored.
fn parse_duration(value: &str) -> Result<Duration> {
    ensure!(!value.trim().is_empty(), "Empty duration");
    let mut total = Duration::ZERO;
    let mut digits = String::new();
    for c in value.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let secs_per_unit: u64 = match c {
            's' => 1,
            'm' => 60,
            'h' => 60 * 60,
            'd' => 24 * 60 * 60,
            _ => bail!("Invalid unit '{}' in duration {:?}", c, value),
        };
        let amount: u64 = digits
            .parse()
            .with_context(|| format!("Missing amount before '{}' in duration {:?}", c, value))?;
        let secs = amount
            .checked_mul(secs_per_unit)
            .with_context(|| format!("Duration {:?} is too long", value))?;
        total += Duration::from_secs(secs);
        digits.clear();
    }
    if !digits.is_empty() {
        total += Duration::from_millis(digits.parse()?);
    }
    Ok(total)
}

/// Installs `env_logger` (filter from `RUST_LOG`, `info` by default).
///
/// Each line carries the wall-clock time, the time elapsed since this call,
/// the level, the thread, and the target.
pub fn init_env_logger() -> Result<()> {
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
    use jiff::SpanRound;

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span.round(span_round).map_err(std::io::Error::other)?;
        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// Minimum time between progress lines, e.g. "30s", "2m", or
    /// "1h30m"; a bare number is in milliseconds. If omitted, the progress
    /// logger's own interval is used.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    #[clap(name = "rank", visible_alias = "pr")]
    Rank(rank::CliArgs),
    #[clap(name = "build")]
    Build(build::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "power-rank", version=build_info::version_string())]
/// Computes PageRank by power iteration.
///
/// Noteworthy environment variables:
///
/// - RUST_LOG: configuration for env_logger
///   <https://docs.rs/env_logger/latest/env_logger/>
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::Rank(args) => {
            rank::main(cli.args, args)?;
        }
        SubCommands::Build(args) => {
            build::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Pretty-prints seconds in a human-readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    let mut result = String::new();
    let mut elapsed_seconds = elapsed as u64;
    let hours = elapsed_seconds / (60 * 60);
    elapsed_seconds %= 60 * 60;
    let minutes = elapsed_seconds / 60;

    match hours {
        0 => {}
        1 => result.push_str("1 hour "),
        _ => result.push_str(&format!("{} hours ", hours)),
    }
    match minutes {
        0 => {}
        1 => result.push_str("1 minute "),
        _ => result.push_str(&format!("{} minutes ", minutes)),
    }

    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}
