/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Sinks for convergence diagnostics.
//!
//! During a [power iteration](crate::rank::power::PowerIteration) the pair
//! (iteration, 𝓁₁ error) is passed periodically, and once more at the end,
//! to a [`ConvergenceObserver`]. This makes it possible to watch a long
//! computation in the logs, or to capture the error sequence in tests.

/// Receives (iteration, error) pairs from a running computation.
pub trait ConvergenceObserver {
    fn observe(&mut self, iteration: usize, error: f64);
}

impl<O: ConvergenceObserver + ?Sized> ConvergenceObserver for &mut O {
    fn observe(&mut self, iteration: usize, error: f64) {
        (**self).observe(iteration, error)
    }
}

/// Logs diagnostics at info level using the [`log`] crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ConvergenceObserver for LogObserver {
    fn observe(&mut self, iteration: usize, error: f64) {
        log::info!("Error after {} iterations: {}", iteration, error);
    }
}

/// Discards diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObserver;

impl ConvergenceObserver for NoObserver {
    fn observe(&mut self, _iteration: usize, _error: f64) {}
}

/// Collects diagnostics in order of arrival.
impl ConvergenceObserver for Vec<(usize, f64)> {
    fn observe(&mut self, iteration: usize, error: f64) {
        self.push((iteration, error));
    }
}

/// Adapts a closure to a [`ConvergenceObserver`].
///
/// ```
/// use power_rank::rank::observer::{ConvergenceObserver, FnObserver};
///
/// let mut last = None;
/// let mut observer = FnObserver(|i, e| last = Some((i, e)));
/// observer.observe(10, 0.5);
/// drop(observer);
/// assert_eq!(last, Some((10, 0.5)));
/// ```
pub struct FnObserver<F: FnMut(usize, f64)>(pub F);

impl<F: FnMut(usize, f64)> ConvergenceObserver for FnObserver<F> {
    fn observe(&mut self, iteration: usize, error: f64) {
        (self.0)(iteration, error)
    }
}
