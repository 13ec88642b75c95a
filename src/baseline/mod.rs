/// Baseline removal: four ways to estimate a slowly varying background and
/// subtract it from the measured intensity.
///
/// ```text
///   intensity ──┬──► als      (iterative reweighted sparse solve)
///               ├──► savgol   (local polynomial smoothing)
///               ├──► median   (sliding median)
///               └──► linear   (line through the endpoints, needs 2theta)
///                        │
///                        ▼
///                   background
///                        │
///   corrected = intensity − background
/// ```

pub mod als;
pub mod difference;
pub mod linear;
pub mod median;
pub mod savgol;

use serde::{Deserialize, Serialize};

use crate::error::{invalid, Result};

use self::als::AlsParams;
use self::linear::{endpoint_background, LinearParams};
use self::median::{median_filter, MedianParams};
use self::savgol::{savgol_filter, SavgolParams};

// ---------------------------------------------------------------------------
// Correction result
// ---------------------------------------------------------------------------

/// Estimated background and the corrected intensity that goes with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub background: Vec<f64>,
    /// `intensity[i] − background[i]` for every `i`.
    pub corrected: Vec<f64>,
}

impl Correction {
    pub fn from_background(intensity: &[f64], background: Vec<f64>) -> Self {
        let corrected = subtract(intensity, &background);
        Correction {
            background,
            corrected,
        }
    }

    pub fn len(&self) -> usize {
        self.corrected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrected.is_empty()
    }
}

/// Element-wise `intensity − background`.
pub(crate) fn subtract(intensity: &[f64], background: &[f64]) -> Vec<f64> {
    intensity
        .iter()
        .zip(background)
        .map(|(y, b)| y - b)
        .collect()
}

// ---------------------------------------------------------------------------
// Method selection
// ---------------------------------------------------------------------------

/// A correction strategy together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum CorrectionMethod {
    Als(AlsParams),
    Savgol(SavgolParams),
    Median(MedianParams),
    Linear(LinearParams),
}

impl Default for CorrectionMethod {
    fn default() -> Self {
        CorrectionMethod::Als(AlsParams::default())
    }
}

impl CorrectionMethod {
    /// Every method with its default parameters, in menu order.
    pub fn all_defaults() -> [CorrectionMethod; 4] {
        [
            CorrectionMethod::Als(AlsParams::default()),
            CorrectionMethod::Savgol(SavgolParams::default()),
            CorrectionMethod::Median(MedianParams::default()),
            CorrectionMethod::Linear(LinearParams::default()),
        ]
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            CorrectionMethod::Als(_) => "Asymmetric least squares",
            CorrectionMethod::Savgol(_) => "Savitzky-Golay",
            CorrectionMethod::Median(_) => "Median filter",
            CorrectionMethod::Linear(_) => "Linear (endpoints)",
        }
    }

    /// Whether `other` is the same strategy, ignoring parameters.
    pub fn same_kind(&self, other: &CorrectionMethod) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Estimate the background of `intensity` and subtract it.
    ///
    /// `angle` is only read by the linear method but must always match
    /// `intensity` in length.
    pub fn apply(&self, angle: &[f64], intensity: &[f64]) -> Result<Correction> {
        if angle.len() != intensity.len() {
            return Err(invalid(format!(
                "angle has {} values but intensity has {}",
                angle.len(),
                intensity.len()
            )));
        }

        let background = match self {
            CorrectionMethod::Als(params) => params.fit(intensity)?.baseline,
            CorrectionMethod::Savgol(p) => savgol_filter(intensity, p.window_length, p.polyorder)?,
            CorrectionMethod::Median(p) => median_filter(intensity, p.kernel_size)?,
            CorrectionMethod::Linear(p) => endpoint_background(angle, intensity, p.order)?,
        };

        log::debug!("{} applied to {} points", self.label(), intensity.len());
        Ok(Correction::from_background(intensity, background))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> (Vec<f64>, Vec<f64>) {
        let angle: Vec<f64> = (0..151).map(|i| 20.0 + 0.1 * i as f64).collect();
        let intensity = angle
            .iter()
            .map(|&a| 100.0 - 0.5 * a + 80.0 * (-((a - 30.0) / 0.3).powi(2)).exp())
            .collect();
        (angle, intensity)
    }

    #[test]
    fn every_method_satisfies_subtraction_invariant() {
        let (angle, intensity) = pattern();
        let methods = [
            CorrectionMethod::Als(AlsParams { lam: 1e4, p: 0.01, niter: 10 }),
            CorrectionMethod::Savgol(SavgolParams { window_length: 31, polyorder: 2 }),
            CorrectionMethod::Median(MedianParams { kernel_size: 21 }),
            CorrectionMethod::Linear(LinearParams { order: 1 }),
        ];
        for method in methods {
            let c = method.apply(&angle, &intensity).unwrap();
            assert_eq!(c.len(), intensity.len());
            for i in 0..intensity.len() {
                assert_eq!(c.corrected[i], intensity[i] - c.background[i], "{}", method.label());
            }
        }
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let res = CorrectionMethod::default().apply(&[1.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!(res.is_err());
    }

    #[test]
    fn method_round_trips_through_json() {
        let m = CorrectionMethod::Median(MedianParams { kernel_size: 7 });
        let text = serde_json::to_string(&m).unwrap();
        assert_eq!(text, r#"{"method":"median","kernel_size":7}"#);
        assert_eq!(serde_json::from_str::<CorrectionMethod>(&text).unwrap(), m);
    }

    #[test]
    fn same_kind_ignores_parameters() {
        let a = CorrectionMethod::Linear(LinearParams { order: 0 });
        let b = CorrectionMethod::Linear(LinearParams { order: 1 });
        assert!(a.same_kind(&b));
        assert!(!a.same_kind(&CorrectionMethod::default()));
    }
}
