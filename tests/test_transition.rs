/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use power_rank::error::RankError;
use power_rank::matrix::{dangling_mask, CscMatrix, TransitionMatrix};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Returns the arcs of a random graph in which every arc is present with
/// probability `p`.
fn random_arcs(n: usize, p: f64, seed: u64) -> Vec<(usize, usize)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut arcs = Vec::new();
    for src in 0..n {
        for dst in 0..n {
            if rng.random_bool(p) {
                arcs.push((src, dst));
            }
        }
    }
    arcs
}

#[test]
fn test_dangling_column_in_the_middle() -> anyhow::Result<()> {
    // Column 2 is empty; the others have assorted content.
    let adjacency = CscMatrix::from_arcs(5, [(0, 1), (0, 4), (1, 1), (3, 2), (4, 0), (4, 3)]);
    let transition = TransitionMatrix::build(adjacency)?;
    assert_eq!(
        transition.dangling(),
        &[false, false, true, false, false]
    );
    assert_eq!(transition.num_dangling(), 1);
    Ok(())
}

#[test]
fn test_columns_are_stochastic() -> anyhow::Result<()> {
    for (seed, &n) in [1, 2, 10, 50, 200].iter().enumerate() {
        for &p in &[0.01, 0.1, 0.5] {
            let arcs = random_arcs(n, p, seed as u64);
            let transition = TransitionMatrix::build(CscMatrix::from_arcs(n, arcs))?;
            let matrix = transition.matrix();
            assert_eq!(matrix.num_rows(), n);
            assert_eq!(matrix.num_cols(), n);

            for (j, sum) in matrix.column_sums().into_iter().enumerate() {
                if transition.dangling()[j] {
                    assert_eq!(matrix.column_nnz(j), 0);
                    assert_eq!(sum, 0.0);
                } else {
                    assert!((sum - 1.0).abs() < 1E-12, "n={n} p={p} column {j}: {sum}");
                    let (_, values) = matrix.column(j);
                    let d = values.len() as f64;
                    assert!(values.iter().all(|&x| x == 1.0 / d));
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_mask_matches_matrix() -> anyhow::Result<()> {
    let arcs = random_arcs(100, 0.02, 7);
    let adjacency = CscMatrix::from_arcs(100, arcs);
    let mask = dangling_mask(&adjacency);
    let transition = TransitionMatrix::build(adjacency.clone())?;
    assert_eq!(transition.dangling(), &*mask);
    for (j, &d) in mask.iter().enumerate() {
        assert_eq!(d, adjacency.column_nnz(j) == 0);
    }
    Ok(())
}

#[test]
fn test_sparsity_pattern_is_preserved() -> anyhow::Result<()> {
    let arcs = random_arcs(30, 0.2, 3);
    let adjacency = CscMatrix::from_arcs(30, arcs);
    let transition = TransitionMatrix::build(adjacency.clone())?;
    assert_eq!(transition.matrix().col_ptrs(), adjacency.col_ptrs());
    assert_eq!(transition.matrix().row_indices(), adjacency.row_indices());
    Ok(())
}

#[test]
fn test_rectangular_is_rejected() {
    let mut matrix = CscMatrix::new(3);
    matrix.push([(0, 1.0)]);
    matrix.push([(1, 1.0), (2, 1.0)]);
    assert_eq!(
        TransitionMatrix::build(matrix),
        Err(RankError::NotSquare { rows: 3, cols: 2 })
    );
}

#[test]
fn test_from_stochastic_recomputes_mask() -> anyhow::Result<()> {
    let transition = TransitionMatrix::build(CscMatrix::from_arcs(3, [(0, 1), (1, 0)]))?;
    let (matrix, _) = transition.clone().into_inner();
    assert_eq!(TransitionMatrix::from_stochastic(matrix)?, transition);
    Ok(())
}
