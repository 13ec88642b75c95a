//! Asymmetric least-squares (ALS) baseline estimation.
//!
//! Each iteration solves the weighted penalized system
//!
//! ```text
//! (W + λ·D·Dᵀ) z = W·y
//! ```
//!
//! with `W = diag(w)` and `D` the second-difference operator, then
//! reweights every sample: `p` if it lies above the current estimate,
//! `1 − p` otherwise. Points sitting on peaks therefore pull the fit less
//! than points on the background, and the baseline settles underneath
//! the peaks.

use faer::linalg::solvers::Solve;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use faer::sparse::{SparseColMat, Triplet};
use faer::{Mat, Side};
use serde::{Deserialize, Serialize};

use crate::error::{invalid, AnalysisError, Result};

use super::difference::SecondDifference;

/// Iteration count used when the caller does not pick one.
pub const DEFAULT_NITER: usize = 10;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// ALS tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlsParams {
    /// Smoothness penalty λ. Larger values give a stiffer baseline.
    pub lam: f64,
    /// Asymmetry: weight given to points above the baseline.
    pub p: f64,
    /// Number of reweighting iterations.
    pub niter: usize,
}

impl Default for AlsParams {
    fn default() -> Self {
        Self {
            lam: 1e5,
            p: 0.01,
            niter: DEFAULT_NITER,
        }
    }
}

/// Result of a full ALS run.
#[derive(Debug, Clone, PartialEq)]
pub struct AlsFit {
    /// Estimated baseline, aligned with the input intensity.
    pub baseline: Vec<f64>,
    /// Weights produced by the last reweighting step; each is `p` or `1 − p`.
    pub weights: Vec<f64>,
}

impl AlsParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.lam.is_finite() && self.lam > 0.0) {
            return Err(invalid(format!("lam must be finite and > 0, got {}", self.lam)));
        }
        if !(self.p > 0.0 && self.p < 1.0) {
            return Err(invalid(format!("p must lie in (0, 1), got {}", self.p)));
        }
        if self.niter < 1 {
            return Err(invalid("niter must be at least 1"));
        }
        Ok(())
    }

    /// Run the estimator on `intensity`.
    pub fn fit(&self, intensity: &[f64]) -> Result<AlsFit> {
        self.validate()?;
        check_finite(intensity, "intensity")?;

        let system = PenalizedSystem::new(intensity.len(), self.lam)?;
        let mut weights = vec![1.0; intensity.len()];
        let mut baseline = Vec::new();

        for iter in 0..self.niter {
            baseline = system.solve(&weights, intensity)?;
            let above = reweight(intensity, &baseline, self.p, &mut weights);
            log::debug!(
                "ALS iteration {}/{}: {above} of {} points above baseline",
                iter + 1,
                self.niter,
                intensity.len()
            );
        }

        Ok(AlsFit { baseline, weights })
    }
}

// ---------------------------------------------------------------------------
// Public function surface
// ---------------------------------------------------------------------------

/// Estimate the baseline of `intensity` by asymmetric least squares.
///
/// Fails with [`AnalysisError::InvalidInput`] when fewer than three points
/// are given, `lam` is not positive, `p` is outside `(0, 1)` or `niter` is
/// zero, and with [`AnalysisError::Numerical`] when the system cannot be
/// factorized.
pub fn baseline_als(intensity: &[f64], lam: f64, p: f64, niter: usize) -> Result<Vec<f64>> {
    AlsParams { lam, p, niter }.fit(intensity).map(|fit| fit.baseline)
}

/// One weighted penalized least-squares solve, `(W + λ·D·Dᵀ) z = W·y`.
///
/// With uniform weights this is the symmetric Whittaker smoother.
pub fn whittaker_smooth(values: &[f64], weights: &[f64], lam: f64) -> Result<Vec<f64>> {
    if weights.len() != values.len() {
        return Err(invalid(format!(
            "{} weights for {} values",
            weights.len(),
            values.len()
        )));
    }
    if !(lam.is_finite() && lam > 0.0) {
        return Err(invalid(format!("lam must be finite and > 0, got {lam}")));
    }
    check_finite(values, "values")?;
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(invalid("weights must be finite and non-negative"));
    }

    PenalizedSystem::new(values.len(), lam)?.solve(weights, values)
}

// ---------------------------------------------------------------------------
// Sparse system
// ---------------------------------------------------------------------------

/// `λ·D·Dᵀ` plus the symbolic Cholesky analysis of `W + λ·D·Dᵀ`.
///
/// The sparsity pattern does not depend on the weights, so the analysis is
/// done once and each solve only refactorizes numerically.
struct PenalizedSystem {
    len: usize,
    penalty: Vec<Triplet<usize, usize, f64>>,
    symbolic: SymbolicLlt<usize>,
}

impl PenalizedSystem {
    fn new(len: usize, lam: f64) -> Result<Self> {
        let op = SecondDifference::new(len)?;
        let penalty: Vec<_> = op
            .gram_triplets()
            .into_iter()
            .map(|t| Triplet::new(t.row, t.col, lam * t.val))
            .collect();

        let pattern = assemble(len, &penalty, &vec![1.0; len])?;
        let symbolic = SymbolicLlt::try_new(pattern.symbolic(), Side::Lower)
            .map_err(|e| AnalysisError::Numerical(format!("symbolic analysis: {e:?}")))?;

        Ok(PenalizedSystem {
            len,
            penalty,
            symbolic,
        })
    }

    fn solve(&self, weights: &[f64], values: &[f64]) -> Result<Vec<f64>> {
        let z = assemble(self.len, &self.penalty, weights)?;
        let llt = Llt::try_new_with_symbolic(self.symbolic.clone(), z.as_ref(), Side::Lower)
            .map_err(|e| AnalysisError::Numerical(format!("system is not positive definite: {e:?}")))?;

        let rhs = Mat::from_fn(self.len, 1, |i, _| weights[i] * values[i]);
        let sol = llt.solve(rhs.as_ref());

        let out: Vec<f64> = (0..self.len).map(|i| sol[(i, 0)]).collect();
        if out.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::Numerical(
                "solve produced non-finite values".into(),
            ));
        }
        Ok(out)
    }
}

/// Build `W + penalty`, folding the weights into the diagonal entries so
/// every structural nonzero appears exactly once.
fn assemble(
    len: usize,
    penalty: &[Triplet<usize, usize, f64>],
    weights: &[f64],
) -> Result<SparseColMat<usize, f64>> {
    let triplets: Vec<_> = penalty
        .iter()
        .map(|t| {
            let val = if t.row == t.col {
                t.val + weights[t.row]
            } else {
                t.val
            };
            Triplet::new(t.row, t.col, val)
        })
        .collect();

    SparseColMat::try_new_from_triplets(len, len, &triplets)
        .map_err(|e| AnalysisError::Numerical(format!("assembling system: {e:?}")))
}

/// Set `weights[i]` to `p` where the sample lies above `baseline` and to
/// `1 − p` everywhere else, ties included. Returns the count above.
fn reweight(intensity: &[f64], baseline: &[f64], p: f64, weights: &mut [f64]) -> usize {
    let mut above = 0;
    for ((w, &y), &z) in weights.iter_mut().zip(intensity).zip(baseline) {
        if y > z {
            *w = p;
            above += 1;
        } else {
            *w = 1.0 - p;
        }
    }
    above
}

fn check_finite(values: &[f64], what: &str) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(invalid(format!("{what}[{i}] is not finite"))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::difference::second_difference_energy;

    /// Smooth background, two peaks and deterministic pseudo-noise.
    fn noisy_pattern(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let x = i as f64 / n as f64;
                let background = 50.0 + 30.0 * x - 20.0 * x * x;
                let peak = 200.0 * (-((x - 0.3) / 0.01).powi(2)).exp()
                    + 120.0 * (-((x - 0.7) / 0.015).powi(2)).exp();
                let noise = ((i as f64 * 12.9898).sin() * 43758.5453).fract() * 4.0;
                background + peak + noise
            })
            .collect()
    }

    fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn single_spike_keeps_baseline_flat() {
        let y = [0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0];
        let z = baseline_als(&y, 1e4, 0.01, 10).unwrap();
        assert_eq!(z.len(), y.len());
        for &v in &z {
            assert!(v.abs() < 0.1, "baseline not flat near zero: {z:?}");
        }
        assert!(y[3] - z[3] > 9.5);
    }

    #[test]
    fn weights_are_binary_after_every_iteration_count() {
        let y = noisy_pattern(120);
        let p = 0.02;
        for niter in 1..=5 {
            let fit = AlsParams { lam: 1e4, p, niter }.fit(&y).unwrap();
            assert!(fit.weights.iter().all(|&w| w == p || w == 1.0 - p));
        }
    }

    #[test]
    fn symmetric_weights_reduce_to_whittaker() {
        let y = noisy_pattern(80);
        let lam = 500.0;

        let one = baseline_als(&y, lam, 0.5, 1).unwrap();
        let expected_one = whittaker_smooth(&y, &vec![1.0; y.len()], lam).unwrap();
        assert!(max_abs_diff(&one, &expected_one) < 1e-9);

        let many = baseline_als(&y, lam, 0.5, 6).unwrap();
        let expected_many = whittaker_smooth(&y, &vec![0.5; y.len()], lam).unwrap();
        assert!(max_abs_diff(&many, &expected_many) < 1e-9);
    }

    #[test]
    fn identical_inputs_give_identical_baselines() {
        let y = noisy_pattern(150);
        let a = baseline_als(&y, 1e5, 0.01, 10).unwrap();
        let b = baseline_als(&y, 1e5, 0.01, 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn larger_lambda_gives_smoother_baseline() {
        let y = noisy_pattern(200);
        let energies: Vec<f64> = [1e1, 1e3, 1e5, 1e7]
            .iter()
            .map(|&lam| second_difference_energy(&baseline_als(&y, lam, 0.01, 10).unwrap()))
            .collect();
        for pair in energies.windows(2) {
            assert!(pair[1] < pair[0], "energies not decreasing: {energies:?}");
        }
    }

    #[test]
    fn baseline_stays_below_peaks() {
        let y = noisy_pattern(200);
        let z = baseline_als(&y, 1e5, 0.01, 10).unwrap();
        // peak centre at x = 0.3
        assert!(y[60] - z[60] > 150.0);
    }

    #[test]
    fn ties_get_background_weight() {
        let y = [1.0, 2.0, 3.0];
        let z = [0.5, 2.0, 3.5];
        let mut w = vec![1.0; 3];
        let above = reweight(&y, &z, 0.1, &mut w);
        assert_eq!(above, 1);
        assert_eq!(w, vec![0.1, 0.9, 0.9]);
    }

    #[test]
    fn rejects_bad_parameters() {
        let y = noisy_pattern(10);
        let bad = [
            AlsParams { lam: 0.0, ..Default::default() },
            AlsParams { lam: -1.0, ..Default::default() },
            AlsParams { lam: f64::NAN, ..Default::default() },
            AlsParams { p: 0.0, ..Default::default() },
            AlsParams { p: 1.0, ..Default::default() },
            AlsParams { niter: 0, ..Default::default() },
        ];
        for params in bad {
            assert!(
                matches!(params.fit(&y), Err(AnalysisError::InvalidInput(_))),
                "{params:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_short_or_non_finite_input() {
        assert!(matches!(
            baseline_als(&[1.0, 2.0], 1e3, 0.01, 10),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            baseline_als(&[1.0, f64::NAN, 2.0], 1e3, 0.01, 10),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn three_points_is_enough() {
        let z = baseline_als(&[1.0, 5.0, 1.0], 1e2, 0.05, 3).unwrap();
        assert_eq!(z.len(), 3);
    }

    #[test]
    fn zero_weights_make_the_system_singular() {
        let res = whittaker_smooth(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0], 1.0);
        assert!(matches!(res, Err(AnalysisError::Numerical(_))));
    }
}
