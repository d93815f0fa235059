/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Returns the indices and values of the `k` largest entries of `rank`, in
/// decreasing order of value.
///
/// Ties are broken by increasing index, and NaNs come last. If `k` exceeds
/// the length of `rank`, all entries are returned.
pub fn top_k(rank: &[f64], k: usize) -> Vec<(usize, f64)> {
    let k = k.min(rank.len());
    if k == 0 {
        return Vec::new();
    }

    let by_rank = |&a: &usize, &b: &usize| {
        rank[b]
            .partial_cmp(&rank[a])
            .unwrap_or_else(|| rank[a].is_nan().cmp(&rank[b].is_nan()))
            .then(a.cmp(&b))
    };

    let mut indices: Vec<usize> = (0..rank.len()).collect();
    if k < indices.len() {
        indices.select_nth_unstable_by(k - 1, by_rank);
        indices.truncate(k);
    }
    indices.sort_unstable_by(by_rank);
    indices.into_iter().map(|i| (i, rank[i])).collect()
}
