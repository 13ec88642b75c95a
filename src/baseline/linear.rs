use serde::{Deserialize, Serialize};

use crate::error::{invalid, Result};

use super::subtract;

/// Order of the endpoint polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearParams {
    /// 0 (constant) or 1 (straight line).
    pub order: usize,
}

impl Default for LinearParams {
    fn default() -> Self {
        Self { order: 1 }
    }
}

/// Remove a background anchored at the first and last samples.
pub fn linear_correct(angle: &[f64], intensity: &[f64], order: usize) -> Result<Vec<f64>> {
    let background = endpoint_background(angle, intensity, order)?;
    Ok(subtract(intensity, &background))
}

/// Evaluate, along `angle`, the polynomial of `order` fitted through the
/// two endpoint samples only.
///
/// Order 0 is the least-squares constant through both endpoints (their
/// mean); order 1 is the line joining them. Higher orders are
/// under-determined by two points and rejected.
pub fn endpoint_background(angle: &[f64], intensity: &[f64], order: usize) -> Result<Vec<f64>> {
    if angle.len() != intensity.len() {
        return Err(invalid(format!(
            "angle has {} values but intensity has {}",
            angle.len(),
            intensity.len()
        )));
    }
    let n = angle.len();
    if n < 2 {
        return Err(invalid("linear correction needs at least 2 points"));
    }
    let (x0, y0) = (angle[0], intensity[0]);
    let (x1, y1) = (angle[n - 1], intensity[n - 1]);

    match order {
        0 => Ok(vec![0.5 * (y0 + y1); n]),
        1 => {
            if x1 == x0 {
                return Err(invalid("first and last angle are identical"));
            }
            if x1 < x0 {
                log::warn!("angle axis decreases from first to last sample");
            }
            let slope = (y1 - y0) / (x1 - x0);
            Ok(angle.iter().map(|&x| y0 + slope * (x - x0)).collect())
        }
        _ => Err(invalid(format!(
            "order {order} is under-determined by two endpoints; use 0 or 1"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn line_through_endpoints() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 5.0, 2.0, 4.0];
        let bg = endpoint_background(&x, &y, 1).unwrap();
        assert_eq!(bg, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(linear_correct(&x, &y, 1).unwrap(), vec![0.0, 3.0, -1.0, 0.0]);
    }

    #[test]
    fn equal_endpoints_give_constant_shift() {
        let x = [10.0, 10.5, 11.0, 11.5, 12.0];
        let y = [3.0, 7.0, 9.0, 4.0, 3.0];
        let corrected = linear_correct(&x, &y, 1).unwrap();
        for (c, v) in corrected.iter().zip(&y) {
            assert_eq!(*c, v - 3.0);
        }
    }

    #[test]
    fn order_zero_is_endpoint_mean() {
        let x = [0.0, 1.0, 2.0];
        let y = [2.0, 10.0, 4.0];
        assert_eq!(endpoint_background(&x, &y, 0).unwrap(), vec![3.0; 3]);
    }

    #[test]
    fn rejects_under_determined_and_degenerate_input() {
        let x = [0.0, 1.0, 2.0];
        let y = [2.0, 10.0, 4.0];
        assert!(matches!(endpoint_background(&x, &y, 2), Err(AnalysisError::InvalidInput(_))));
        assert!(matches!(endpoint_background(&[1.0], &[1.0], 1), Err(AnalysisError::InvalidInput(_))));
        assert!(matches!(endpoint_background(&[], &[], 1), Err(AnalysisError::InvalidInput(_))));
        assert!(matches!(endpoint_background(&x, &y[..2], 1), Err(AnalysisError::InvalidInput(_))));
        assert!(matches!(
            endpoint_background(&[1.0, 1.0], &[0.0, 2.0], 1),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
