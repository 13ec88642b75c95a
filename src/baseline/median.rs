use serde::{Deserialize, Serialize};

use crate::error::{invalid, Result};

use super::subtract;

/// Sliding-median kernel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedianParams {
    /// Odd window length in samples.
    pub kernel_size: usize,
}

impl Default for MedianParams {
    fn default() -> Self {
        Self { kernel_size: 51 }
    }
}

/// Remove a sliding-median background: `intensity − median_filter(intensity)`.
pub fn median_correct(intensity: &[f64], kernel_size: usize) -> Result<Vec<f64>> {
    let background = median_filter(intensity, kernel_size)?;
    Ok(subtract(intensity, &background))
}

/// Sliding-window median with zero padding beyond both ends.
///
/// A kernel wider than the signal is accepted; the padding then dominates.
pub fn median_filter(values: &[f64], kernel_size: usize) -> Result<Vec<f64>> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(invalid(format!(
            "kernel_size must be a positive odd number, got {kernel_size}"
        )));
    }
    if kernel_size > values.len() {
        log::warn!(
            "median kernel ({kernel_size}) is wider than the signal ({}); padding dominates",
            values.len()
        );
    }

    let half = kernel_size / 2;
    let n = values.len() as isize;
    let mut window = Vec::with_capacity(kernel_size);

    let out = (0..values.len())
        .map(|i| {
            window.clear();
            let centre = i as isize;
            window.extend((centre - half as isize..=centre + half as isize).map(|j| {
                if (0..n).contains(&j) {
                    values[j as usize]
                } else {
                    0.0
                }
            }));
            window.sort_unstable_by(f64::total_cmp);
            window[half]
        })
        .collect();

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn removes_isolated_spike() {
        let y = [1.0, 1.0, 9.0, 1.0, 1.0];
        assert_eq!(median_filter(&y, 3).unwrap(), vec![1.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(median_correct(&y, 3).unwrap(), vec![0.0, 0.0, 8.0, 0.0, 0.0]);
    }

    #[test]
    fn edges_are_zero_padded() {
        let y = [5.0, 6.0, 7.0];
        // windows: [0,5,6] [5,6,7] [6,7,0]
        assert_eq!(median_filter(&y, 3).unwrap(), vec![5.0, 6.0, 6.0]);
    }

    #[test]
    fn kernel_wider_than_signal() {
        let y = [5.0, 6.0, 7.0];
        // every window holds at least four zeros
        assert_eq!(median_filter(&y, 9).unwrap(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn kernel_of_one_is_identity() {
        let y = [3.0, -1.0, 2.5];
        assert_eq!(median_filter(&y, 1).unwrap(), y.to_vec());
    }

    #[test]
    fn rejects_even_or_zero_kernel() {
        assert!(matches!(median_filter(&[1.0; 5], 4), Err(AnalysisError::InvalidInput(_))));
        assert!(matches!(median_filter(&[1.0; 5], 0), Err(AnalysisError::InvalidInput(_))));
    }
}
