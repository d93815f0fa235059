/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![cfg(feature = "cli")]

use anyhow::Result;
use power_rank::cli::{
    cli_main, load_labels, load_matrix, store_matrix, FloatVectorFormat,
};
use power_rank::error::RankError;
use power_rank::graphs::Adjacency;
use power_rank::matrix::{CscMatrix, TransitionMatrix};
use power_rank::rank::{preds, PowerIteration};
use std::path::{Path, PathBuf};

const GRAPH: &str = "\
a b c
b c
c a
d a
e d
";

fn write_graph(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("graph.adjlist");
    std::fs::write(&path, GRAPH)?;
    Ok(path)
}

fn expected_rank() -> Result<Vec<f64>> {
    let (_, matrix) = Adjacency::from_reader(GRAPH.as_bytes())?.into_parts();
    let t = TransitionMatrix::build(matrix)?;
    let mut pr = PowerIteration::new(&t);
    pr.run(preds::L1Norm::try_from(1E-12)?)?;
    Ok(pr.rank().to_vec())
}

#[test]
fn test_float_vector_formats() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let values = [0.1, 1.0 / 3.0, 0.0, 2.5E-300, 1E10];
    for fmt in [
        FloatVectorFormat::Java,
        FloatVectorFormat::Ascii,
        FloatVectorFormat::Json,
    ] {
        let path = dir.path().join(format!("values.{fmt:?}"));
        fmt.store(&path, &values, None)?;
        assert_eq!(fmt.load(&path)?, values, "{fmt:?}");
    }

    let path = dir.path().join("short.txt");
    FloatVectorFormat::Ascii.store(&path, &values, Some(2))?;
    assert_eq!(
        FloatVectorFormat::Ascii.load(&path)?,
        [0.1, 0.33, 0.0, 0.0, 1E10]
    );

    let path = dir.path().join("empty.json");
    FloatVectorFormat::Json.store(&path, &[], None)?;
    assert!(FloatVectorFormat::Json.load(&path)?.is_empty());
    Ok(())
}

#[test]
fn test_truncated_java_vector() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bad.ranks");
    std::fs::write(&path, [0u8; 12])?;
    assert!(FloatVectorFormat::Java.load(&path).is_err());
    Ok(())
}

#[test]
fn test_store_load_matrix() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sub").join("m.csc");
    let t = TransitionMatrix::build(CscMatrix::from_arcs(
        4,
        [(0, 1), (0, 2), (1, 2), (2, 0)],
    ))?;
    store_matrix(&path, t.matrix())?;
    let loaded = load_matrix(&path)?;
    assert_eq!(&loaded, t.matrix());
    assert_eq!(TransitionMatrix::from_stochastic(loaded)?.dangling(), t.dangling());
    Ok(())
}

#[test]
fn test_rank_command() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_graph(dir.path())?;

    cli_main(["power-rank", "rank", graph.to_str().unwrap(), "12", "-k", "3"])?;

    let ranks = FloatVectorFormat::Java.load(dir.path().join("graph.ranks"))?;
    assert_eq!(ranks.len(), 5);
    assert!((ranks.iter().sum::<f64>() - 1.0).abs() < 1E-12);
    let expected = expected_rank()?;
    for (x, y) in ranks.iter().zip(&expected) {
        assert!((x - y).abs() < 1E-10);
    }

    assert_eq!(
        load_labels(dir.path().join("graph.nodes"))?,
        ["a", "b", "c", "d", "e"]
    );
    let matrix = load_matrix(dir.path().join("graph.csc"))?;
    assert_eq!(matrix.num_cols(), 5);

    // A second run starts from the cached matrix and ranking.
    cli_main(["power-rank", "pr", graph.to_str().unwrap(), "--threshold", "1E-12"])?;
    let again = FloatVectorFormat::Java.load(dir.path().join("graph.ranks"))?;
    for (x, y) in again.iter().zip(&expected) {
        assert!((x - y).abs() < 1E-10);
    }
    Ok(())
}

#[test]
fn test_rank_command_no_cache() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_graph(dir.path())?;
    cli_main(["power-rank", "rank", graph.to_str().unwrap(), "--no-cache"])?;
    assert!(!dir.path().join("graph.csc").exists());
    assert!(!dir.path().join("graph.ranks").exists());
    assert!(!dir.path().join("graph.nodes").exists());
    Ok(())
}

#[test]
fn test_rank_command_max_iter() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_graph(dir.path())?;
    let result = cli_main([
        "power-rank",
        "rank",
        graph.to_str().unwrap(),
        "15",
        "--max-iter",
        "2",
        "--fmt",
        "ascii",
    ]);
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RankError>(),
        Some(RankError::NonConvergence { iterations: 2, .. })
    ));
    // The last approximation is stored anyway.
    let ranks = FloatVectorFormat::Ascii.load(dir.path().join("graph.ranks"))?;
    assert_eq!(ranks.len(), 5);
    Ok(())
}

#[test]
fn test_rank_command_invalid_alpha() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_graph(dir.path())?;
    let result = cli_main(["power-rank", "rank", graph.to_str().unwrap(), "--alpha", "1.0"]);
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_rank_command_tolerance_exponent_out_of_range() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_graph(dir.path())?;
    for tol in ["0", "400", "2147483648", "4294967295"] {
        let result = cli_main(["power-rank", "rank", graph.to_str().unwrap(), tol]);
        assert!(result.is_err(), "tolerance exponent {tol}");
    }
    assert!(!dir.path().join("graph.ranks").exists());
    Ok(())
}

#[test]
fn test_build_command() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_graph(dir.path())?;
    cli_main(["power-rank", "build", graph.to_str().unwrap()])?;
    let matrix = load_matrix(dir.path().join("graph.csc"))?;
    let t = TransitionMatrix::from_stochastic(matrix)?;
    assert_eq!(t.num_nodes(), 5);
    assert_eq!(t.num_dangling(), 0);
    assert_eq!(load_labels(dir.path().join("graph.nodes"))?.len(), 5);
    Ok(())
}

#[test]
fn test_wrong_extension() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("graph.txt");
    std::fs::write(&path, GRAPH)?;
    assert!(cli_main(["power-rank", "build", path.to_str().unwrap()]).is_err());
    Ok(())
}
