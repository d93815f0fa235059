/*
 * SPDX-FileCopyrightText: 2026 power-rank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank by power iteration.
//!
//! # The formula
//!
//! Let *A* be the column-stochastic [transition matrix](crate::matrix::transition)
//! of a graph with *n* nodes (with zero columns for dangling nodes), **z** the
//! characteristic vector of dangling nodes, and α the damping factor. Note
//! that here α is the probability of _teleporting_: with probability 1 − α
//! the surfer follows an arc. One step maps the current approximation **v**
//! to
//!
//! > **v**′ = (1 − α) ( *A* **v** + (*w*/*n*) **1** ) + (α/*n*) **1**,
//!
//! where *w* = **z** · **v** is the rank currently sitting on dangling nodes.
//! Redistributing *w* uniformly keeps the operator stochastic: if **v** sums
//! to one, so does **v**′. Without that term, rank would leak out of the
//! system through dangling nodes at every step.
//!
//! For α ∈ (0 . . 1) the operator is a contraction in 𝓁₁ norm with
//! coefficient 1 − α, so the iteration converges to the unique fixed point
//! from any stochastic starting vector.
//!
//! # Stopping criteria
//!
//! The [`run`](PowerIteration::run) method accepts a composable [`Predicate`]
//! that is evaluated after each step on the iteration number and on the 𝓁₁
//! distance between the last two approximations. At least one step is always
//! performed.
//!
//! There is no built-in limit on the number of iterations: if you want one,
//! set it with [`max_iter`](PowerIteration::max_iter), in which case
//! reaching it before the predicate holds is reported as
//! [`RankError::NonConvergence`].
//!
//! # Diagnostics
//!
//! Every [`log_every`](PowerIteration::log_every) iterations (10 by default),
//! and once more when the loop ends, the pair (iteration, error) is passed to
//! a [`ConvergenceObserver`].

pub mod preds {
    //! Stopping conditions for [`PowerIteration`](super::PowerIteration).
    //!
    //! After each step the engine evaluates a [`Predicate`] on a
    //! [`PredParams`] carrying the number of steps performed so far and the
    //! 𝓁₁ distance between the last two approximations; the loop ends as soon
    //! as the predicate holds. [`L1Norm`] is the usual tolerance test, and
    //! [`MaxIter`] caps the number of steps. Since both implement
    //! [`Predicate`], they compose with `and`/`or` from
    //! [`predicates::prelude`]:
    //!
    //! ```
    //! use predicates::prelude::*;
    //! use power_rank::rank::power::preds::{L1Norm, MaxIter};
    //!
    //! let stop = L1Norm::from_exponent(9)?.or(MaxIter::from(200));
    //! # Ok::<(), anyhow::Error>(())
    //! ```
    //!
    //! Note that a predicate that stops at a step cap reports success;
    //! use [`max_iter`](super::PowerIteration::max_iter) to have reaching the
    //! cap reported as an error instead.

    use anyhow::ensure;
    use predicates::{reflection::PredicateReflection, Predicate};
    use std::fmt::{Display, Formatter};

    /// The state of the iteration after a step.
    #[derive(Debug, Clone, Copy)]
    pub struct PredParams {
        /// Steps performed so far (at least one).
        pub iteration: usize,
        /// 𝓁₁ distance between the last two approximations.
        pub error: f64,
    }

    /// Holds once `max_iter` steps have been performed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MaxIter(usize);

    impl From<usize> for MaxIter {
        fn from(max_iter: usize) -> Self {
            MaxIter(max_iter)
        }
    }

    impl Display for MaxIter {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "at most {} iterations", self.0)
        }
    }

    impl PredicateReflection for MaxIter {}

    impl Predicate<PredParams> for MaxIter {
        fn eval(&self, params: &PredParams) -> bool {
            params.iteration >= self.0
        }
    }

    /// Holds when the 𝓁₁ error is at most a positive threshold.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct L1Norm {
        threshold: f64,
    }

    impl L1Norm {
        pub const DEFAULT_THRESHOLD: f64 = 1E-6;

        /// The largest exponent accepted by [`from_exponent`](Self::from_exponent).
        pub const MAX_EXPONENT: u32 = f64::MIN_10_EXP.unsigned_abs();

        /// Creates a predicate with the given threshold, which must be
        /// positive (and hence not NaN).
        pub fn new(threshold: f64) -> anyhow::Result<Self> {
            ensure!(
                threshold > 0.0,
                "The threshold must be positive, got {}",
                threshold
            );
            Ok(L1Norm { threshold })
        }

        /// Creates a predicate with threshold 10⁻ᵉˣᵖ.
        ///
        /// The exponent must be in [1 . . [`MAX_EXPONENT`](Self::MAX_EXPONENT)],
        /// so that the threshold is a normal double.
        pub fn from_exponent(exp: u32) -> anyhow::Result<Self> {
            ensure!(
                (1..=Self::MAX_EXPONENT).contains(&exp),
                "The exponent must be between 1 and {}, got {}",
                Self::MAX_EXPONENT,
                exp
            );
            Self::new(10f64.powi(-(exp as i32)))
        }

        pub fn threshold(&self) -> f64 {
            self.threshold
        }
    }

    /// `None` gives the [default threshold](L1Norm::DEFAULT_THRESHOLD).
    impl TryFrom<Option<f64>> for L1Norm {
        type Error = anyhow::Error;
        fn try_from(threshold: Option<f64>) -> anyhow::Result<Self> {
            threshold.map_or_else(|| Ok(Self::default()), Self::new)
        }
    }

    impl TryFrom<f64> for L1Norm {
        type Error = anyhow::Error;
        fn try_from(threshold: f64) -> anyhow::Result<Self> {
            Self::new(threshold)
        }
    }

    impl Default for L1Norm {
        fn default() -> Self {
            L1Norm {
                threshold: Self::DEFAULT_THRESHOLD,
            }
        }
    }

    impl Display for L1Norm {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "error at most {}", self.threshold)
        }
    }

    impl PredicateReflection for L1Norm {}

    impl Predicate<PredParams> for L1Norm {
        fn eval(&self, params: &PredParams) -> bool {
            params.error <= self.threshold
        }
    }
}

use crate::error::RankError;
use crate::matrix::TransitionMatrix;
use crate::rank::observer::{ConvergenceObserver, LogObserver};
use dsi_progress_logger::{no_logging, ProgressLog};
use kahan::KahanSum;
use predicates::Predicate;

/// Returns the 𝓁₁ distance between two vectors, using Kahan summation.
///
/// # Panics
///
/// Panics if the vectors have different lengths.
pub fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .fold(KahanSum::<f64>::new(), |acc, (x, y)| acc + (x - y).abs())
        .sum()
}

/// Computes PageRank by power iteration on a [`TransitionMatrix`].
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run). After completion the rank vector is available via the
/// [`rank`](Self::rank) method.
///
/// # Examples
///
/// ```
/// use power_rank::matrix::{CscMatrix, TransitionMatrix};
/// use power_rank::rank::power::{PowerIteration, preds};
///
/// // 0 → 1, 0 → 2, 1 → 2, 2 → 0, 3 → 0, 4 → 3
/// let adjacency = CscMatrix::from_arcs(5, [(0, 1), (0, 2), (1, 2), (2, 0), (3, 0), (4, 3)]);
/// let transition = TransitionMatrix::build(adjacency)?;
///
/// let mut pr = PowerIteration::new(&transition);
/// pr.alpha(0.15)?;
/// pr.run(preds::L1Norm::try_from(1E-9)?)?;
///
/// assert_eq!(pr.rank().len(), 5);
/// assert!((pr.rank().iter().sum::<f64>() - 1.0).abs() < 1E-9);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct PowerIteration<'a> {
    transition: &'a TransitionMatrix,
    alpha: f64,
    start: Option<&'a [f64]>,
    max_iter: Option<usize>,
    log_every: usize,

    rank: Box<[f64]>,
    iteration: usize,
    error: f64,
}

impl std::fmt::Debug for PowerIteration<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerIteration")
            .field("alpha", &self.alpha)
            .field("max_iter", &self.max_iter)
            .field("log_every", &self.log_every)
            .field("error", &self.error)
            .field("iteration", &self.iteration)
            .finish_non_exhaustive()
    }
}

impl<'a> PowerIteration<'a> {
    pub const DEFAULT_ALPHA: f64 = 0.15;
    pub const DEFAULT_LOG_EVERY: usize = 10;

    /// Creates a new power-iteration computation on the given transition
    /// matrix.
    pub fn new(transition: &'a TransitionMatrix) -> Self {
        Self {
            transition,
            alpha: Self::DEFAULT_ALPHA,
            start: None,
            max_iter: None,
            log_every: Self::DEFAULT_LOG_EVERY,
            rank: Box::default(),
            iteration: 0,
            error: f64::INFINITY,
        }
    }

    /// Sets the damping factor α, that is, the teleportation probability.
    ///
    /// The value must be in [0 . . 1). Note that with α = 0 convergence is not
    /// guaranteed.
    pub fn alpha(&mut self, alpha: f64) -> Result<&mut Self, RankError> {
        // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
        if !(0.0..1.0).contains(&alpha) {
            return Err(RankError::InvalidParameter {
                name: "alpha",
                reason: format!("the damping factor must be in [0 . . 1), got {alpha}"),
            });
        }
        self.alpha = alpha;
        Ok(self)
    }

    /// Sets the starting vector, for example a ranking computed by a previous
    /// run.
    ///
    /// Pass `None` to start from the uniform vector (1/*n*). A vector whose
    /// length does not match the number of nodes is ignored (with a warning)
    /// when the computation starts, and the uniform vector is used instead.
    ///
    /// In test mode, we check for stochasticity (nonnegative entries summing
    /// to 1 within a tolerance of 1E-6) of vectors of the right length and
    /// panic if the check fails.
    pub fn start(&mut self, start: Option<&'a [f64]>) -> &mut Self {
        #[cfg(test)]
        self.check_start(start);
        self.start = start;
        self
    }

    /// Sets the maximum number of iterations; `None` (the default) means no
    /// limit.
    pub fn max_iter(&mut self, max_iter: Option<usize>) -> &mut Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets how often (in iterations) the error is passed to the observer.
    ///
    /// # Panics
    ///
    /// Panics if `log_every` is zero.
    pub fn log_every(&mut self, log_every: usize) -> &mut Self {
        assert!(log_every > 0, "The logging period must be positive");
        self.log_every = log_every;
        self
    }

    /// Returns the rank vector.
    ///
    /// After calling [`run`](Self::run), this contains the last
    /// approximation computed.
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Consumes the computation and returns the rank vector.
    pub fn into_rank(self) -> Box<[f64]> {
        self.rank
    }

    /// Returns the number of steps performed by the last call to
    /// [`run`](Self::run).
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Returns the 𝓁₁ distance between the last two approximations.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Performs one step of the power method, storing in `next` the image of
    /// `current`, and returns the 𝓁₁ distance between the two vectors.
    ///
    /// Fails with [`RankError::DimensionMismatch`] if the vectors do not
    /// match the number of nodes.
    pub fn step(&self, current: &[f64], next: &mut [f64]) -> Result<f64, RankError> {
        let n = self.transition.num_nodes();
        for (what, found) in [("current vector", current.len()), ("next vector", next.len())] {
            if found != n {
                return Err(RankError::DimensionMismatch {
                    what,
                    expected: n,
                    found,
                });
            }
        }
        let inv_n = 1.0 / n as f64;

        let dangling_rank = self
            .transition
            .dangling()
            .iter()
            .zip(current)
            .filter(|&(&d, _)| d)
            .fold(KahanSum::<f64>::new(), |acc, (_, &x)| acc + x)
            .sum();

        self.transition.matrix().mul_vec_into(current, next);

        let dangling_share = dangling_rank * inv_n;
        let teleport = self.alpha * inv_n;
        for x in next.iter_mut() {
            *x = (1.0 - self.alpha) * (*x + dangling_share) + teleport;
        }

        Ok(l1_distance(next, current))
    }

    /// Runs the computation until the given predicate is satisfied, sending
    /// diagnostics to the [`log`] crate.
    pub fn run(&mut self, predicate: impl Predicate<preds::PredParams>) -> Result<(), RankError> {
        self.run_with_logging(predicate, no_logging![], &mut LogObserver)
    }

    /// Runs the computation until the given predicate is satisfied, logging
    /// progress.
    ///
    /// `pl` counts iterations; its options will be preserved, making thus
    /// possible to customize the logs. You can pass
    /// [`no_logging![]`](dsi_progress_logger::no_logging) if you don't need
    /// it. `observer` receives the convergence diagnostics.
    pub fn run_with_logging(
        &mut self,
        predicate: impl Predicate<preds::PredParams>,
        pl: &mut impl ProgressLog,
        observer: &mut impl ConvergenceObserver,
    ) -> Result<(), RankError> {
        let n = self.transition.num_nodes();
        self.iteration = 0;
        self.error = f64::INFINITY;
        if n == 0 {
            self.rank = Box::default();
            return Ok(());
        }

        log::info!("Alpha: {}", self.alpha);
        log::info!(
            "{} dangling nodes out of {}",
            self.transition.num_dangling(),
            n
        );
        log::info!("Stopping criterion: {}", predicate);
        if let Some(max_iter) = self.max_iter {
            log::info!("Maximum number of iterations: {}", max_iter);
        }

        let inv_n = 1.0 / n as f64;
        let mut current: Box<[f64]> = match self.start {
            Some(v) if v.len() == n => {
                log::info!("Starting from the given vector");
                v.into()
            }
            Some(v) => {
                log::warn!(
                    "The starting vector has length {} but there are {} nodes: starting from the uniform vector",
                    v.len(),
                    n
                );
                vec![inv_n; n].into_boxed_slice()
            }
            None => vec![inv_n; n].into_boxed_slice(),
        };
        let mut next = vec![0.0; n].into_boxed_slice();

        pl.item_name("iteration");
        pl.expected_updates(self.max_iter);
        pl.start(format!("Computing PageRank (alpha={})...", self.alpha));

        let converged = loop {
            self.error = self.step(&current, &mut next)?;
            std::mem::swap(&mut current, &mut next);
            self.iteration += 1;
            pl.update();

            if self.iteration % self.log_every == 0 {
                observer.observe(self.iteration, self.error);
            }

            if predicate.eval(&preds::PredParams {
                iteration: self.iteration,
                error: self.error,
            }) {
                break true;
            }
            if self.max_iter.is_some_and(|max_iter| self.iteration >= max_iter) {
                break false;
            }
        };

        observer.observe(self.iteration, self.error);
        pl.done();
        self.rank = current;

        if converged {
            Ok(())
        } else {
            Err(RankError::NonConvergence {
                iterations: self.iteration,
                error: self.error,
            })
        }
    }

    #[cfg(test)]
    fn check_start(&self, start: Option<&[f64]>) {
        if let Some(v) = start.filter(|v| v.len() == self.transition.num_nodes()) {
            Self::assert_stochastic(v, "start");
        }
    }

    /// Checks that a vector is stochastic (all entries nonnegative and summing
    /// to 1 within a tolerance of 1E-6).
    #[cfg(test)]
    fn assert_stochastic(v: &[f64], name: &str) {
        for (i, &x) in v.iter().enumerate() {
            assert!(
                x >= 0.0,
                "The {name} vector has a negative entry at index {i}: {x}"
            );
        }
        let sum: f64 = v.iter().sum();
        assert!(
            (sum - 1.0).abs() < 1E-6,
            "The {name} vector is not stochastic (sum = {sum})"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::CscMatrix;

    fn cycle(n: usize) -> TransitionMatrix {
        TransitionMatrix::build(CscMatrix::from_arcs(n, (0..n).map(|i| (i, (i + 1) % n))))
            .unwrap()
    }

    #[test]
    fn test_alpha_domain() {
        let t = cycle(3);
        let mut pr = PowerIteration::new(&t);
        assert!(pr.alpha(0.0).is_ok());
        assert!(pr.alpha(0.5).is_ok());
        assert!(matches!(
            pr.alpha(1.0),
            Err(RankError::InvalidParameter { name: "alpha", .. })
        ));
        assert!(pr.alpha(-0.1).is_err());
        assert!(pr.alpha(f64::NAN).is_err());
    }

    #[test]
    fn test_step_conserves_mass() {
        // 0 → 1, 1 dangling
        let t = TransitionMatrix::build(CscMatrix::from_arcs(2, [(0, 1)])).unwrap();
        let pr = PowerIteration::new(&t);
        let current = [0.3, 0.7];
        let mut next = [0.0; 2];
        pr.step(&current, &mut next).unwrap();
        assert!((next.iter().sum::<f64>() - 1.0).abs() < 1E-12);
        // (1 − α)(0 + 0.35) + 0.075 and (1 − α)(0.3 + 0.35) + 0.075
        assert!((next[0] - (0.85 * 0.35 + 0.075)).abs() < 1E-15);
        assert!((next[1] - (0.85 * 0.65 + 0.075)).abs() < 1E-15);
    }

    #[test]
    #[should_panic(expected = "not stochastic")]
    fn test_start_must_be_stochastic() {
        let t = cycle(2);
        let v = [0.5, 0.6];
        PowerIteration::new(&t).start(Some(&v));
    }

    #[test]
    #[should_panic]
    fn test_zero_log_every() {
        let t = cycle(2);
        PowerIteration::new(&t).log_every(0);
    }

    #[test]
    fn test_from_exponent() {
        assert!(preds::L1Norm::from_exponent(0).is_err());
        let t = preds::L1Norm::from_exponent(8).unwrap().threshold();
        assert!((t - 1E-8).abs() < 1E-22);
        let t = preds::L1Norm::from_exponent(preds::L1Norm::MAX_EXPONENT)
            .unwrap()
            .threshold();
        assert!(t > 0.0 && t.is_normal());
        assert!(preds::L1Norm::from_exponent(preds::L1Norm::MAX_EXPONENT + 1).is_err());
        assert!(preds::L1Norm::from_exponent(1 << 31).is_err());
        assert!(preds::L1Norm::from_exponent(3_000_000_000).is_err());
        assert!(preds::L1Norm::from_exponent(u32::MAX).is_err());
    }

    #[test]
    fn test_threshold_domain() {
        assert!(preds::L1Norm::new(f64::NAN).is_err());
        assert!(preds::L1Norm::new(0.0).is_err());
        assert!(preds::L1Norm::try_from(-1E-3).is_err());
        assert_eq!(
            preds::L1Norm::try_from(None).unwrap(),
            preds::L1Norm::default()
        );
        assert_eq!(preds::L1Norm::try_from(Some(0.5)).unwrap().threshold(), 0.5);
    }

    #[test]
    fn test_step_dimension_mismatch() {
        let t = cycle(3);
        let pr = PowerIteration::new(&t);
        let mut next = [0.0; 3];
        assert_eq!(
            pr.step(&[0.5, 0.5], &mut next),
            Err(RankError::DimensionMismatch {
                what: "current vector",
                expected: 3,
                found: 2
            })
        );
        let mut long = [0.0; 4];
        assert_eq!(
            pr.step(&[1.0 / 3.0; 3], &mut long),
            Err(RankError::DimensionMismatch {
                what: "next vector",
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_l1_distance() {
        assert_eq!(l1_distance(&[1.0, 2.0, 3.0], &[0.5, 2.0, 4.0]), 1.5);
        assert_eq!(l1_distance(&[], &[]), 0.0);
    }
}
