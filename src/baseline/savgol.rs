use faer::linalg::solvers::{Llt, Solve};
use faer::{Mat, Side};
use sci_rs::signal::filter::savgol_coeffs_dyn;
use serde::{Deserialize, Serialize};

use crate::error::{invalid, AnalysisError, Result};

use super::subtract;

/// Savitzky-Golay smoothing window and polynomial order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavgolParams {
    /// Odd window length in samples.
    pub window_length: usize,
    /// Order of the local polynomial, below `window_length`.
    pub polyorder: usize,
}

impl Default for SavgolParams {
    fn default() -> Self {
        Self {
            window_length: 101,
            polyorder: 2,
        }
    }
}

impl SavgolParams {
    fn validate(&self, len: usize) -> Result<()> {
        if self.window_length % 2 == 0 {
            return Err(invalid(format!(
                "window_length must be odd, got {}",
                self.window_length
            )));
        }
        if self.polyorder >= self.window_length {
            return Err(invalid(format!(
                "polyorder ({}) must be less than window_length ({})",
                self.polyorder, self.window_length
            )));
        }
        if self.window_length > len {
            return Err(invalid(format!(
                "window_length ({}) exceeds signal length ({len})",
                self.window_length
            )));
        }
        Ok(())
    }
}

/// Remove a Savitzky-Golay background: `intensity − savgol(intensity)`.
pub fn savgol_correct(intensity: &[f64], window_length: usize, polyorder: usize) -> Result<Vec<f64>> {
    let background = savgol_filter(intensity, window_length, polyorder)?;
    Ok(subtract(intensity, &background))
}

/// Smooth `values` with a Savitzky-Golay filter.
///
/// Interior samples get the least-squares convolution of the centred
/// window, with weights from `sci_rs`. The first and last
/// `window_length / 2` samples are taken from a polynomial of order
/// `polyorder` fitted to the first / last full window.
pub fn savgol_filter(values: &[f64], window_length: usize, polyorder: usize) -> Result<Vec<f64>> {
    SavgolParams {
        window_length,
        polyorder,
    }
    .validate(values.len())?;

    let n = values.len();
    let half = window_length / 2;
    let coeffs = smoothing_coefficients(window_length, polyorder);

    let mut out = vec![0.0; n];
    for j in half..n - half {
        out[j] = coeffs
            .iter()
            .zip(&values[j - half..=j + half])
            .map(|(h, y)| h * y)
            .sum();
    }

    if half > 0 {
        let head = fit_window(&values[..window_length], polyorder)?;
        out[..half].copy_from_slice(&head[..half]);

        let tail = fit_window(&values[n - window_length..], polyorder)?;
        out[n - half..].copy_from_slice(&tail[window_length - half..]);
    }

    log::debug!("savgol: window {window_length}, order {polyorder}, {n} points");
    Ok(out)
}

// ---------------------------------------------------------------------------
// Least-squares helpers
// ---------------------------------------------------------------------------

/// Abscissae of a window, centred and scaled into `[-1, 1]`.
fn window_abscissae(window_length: usize) -> Vec<f64> {
    let half = window_length / 2;
    let scale = half.max(1) as f64;
    (0..window_length)
        .map(|i| (i as f64 - half as f64) / scale)
        .collect()
}

/// Normal-equation matrix `JᵀJ` of the Vandermonde matrix `J[i][k] = tᵢᵏ`.
fn gram(t: &[f64], order: usize) -> Mat<f64> {
    Mat::from_fn(order + 1, order + 1, |a, b| {
        t.iter().map(|&x| x.powi((a + b) as i32)).sum::<f64>()
    })
}

fn factor(g: &Mat<f64>) -> Result<Llt<f64>> {
    Llt::new(g.as_ref(), Side::Lower)
        .map_err(|e| AnalysisError::Numerical(format!("polynomial fit: {e:?}")))
}

/// Weights `h` such that `Σ hᵢ·yᵢ` is the centre value of the local fit.
///
/// Arguments must already be validated. The smoothing kernel is symmetric,
/// so convolution and correlation order coincide.
fn smoothing_coefficients(window_length: usize, order: usize) -> Vec<f64> {
    if window_length == 1 {
        return vec![1.0];
    }
    savgol_coeffs_dyn::<f64>(window_length, order, None, None)
}

/// Fit a polynomial to one window and evaluate it at every sample of it.
fn fit_window(window: &[f64], order: usize) -> Result<Vec<f64>> {
    let t = window_abscissae(window.len());
    let llt = factor(&gram(&t, order))?;
    let rhs = Mat::from_fn(order + 1, 1, |k, _| {
        t.iter()
            .zip(window)
            .map(|(&x, &y)| x.powi(k as i32) * y)
            .sum::<f64>()
    });
    let c = llt.solve(rhs.as_ref());

    Ok(t
        .iter()
        .map(|&x| (0..=order).rev().fold(0.0, |acc, k| acc * x + c[(k, 0)]))
        .collect())
}
