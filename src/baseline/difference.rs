use faer::sparse::Triplet;

use crate::error::{invalid, Result};

/// Second-difference stencil, top to bottom within one column of `D`.
const STENCIL: [f64; 3] = [1.0, -2.0, 1.0];

// ---------------------------------------------------------------------------
// Second-difference operator
// ---------------------------------------------------------------------------

/// The `L × (L−2)` banded operator `D` with `[1, −2, 1]` on the main, first
/// and second sub-diagonals.
///
/// Column `j` holds the stencil on rows `j, j+1, j+2`, so `Dᵀ·v` is the
/// vector of discrete second differences of `v`.
#[derive(Debug, Clone, Copy)]
pub struct SecondDifference {
    len: usize,
}

impl SecondDifference {
    pub fn new(len: usize) -> Result<Self> {
        if len < 3 {
            return Err(invalid(format!(
                "second-difference operator needs at least 3 points, got {len}"
            )));
        }
        Ok(SecondDifference { len })
    }

    /// Number of rows (`L`).
    pub fn rows(&self) -> usize {
        self.len
    }

    /// Number of columns (`L − 2`).
    pub fn cols(&self) -> usize {
        self.len - 2
    }

    /// Nonzero entries of `D` as `(row, col, value)`.
    pub fn triplets(&self) -> Vec<Triplet<usize, usize, f64>> {
        (0..self.cols())
            .flat_map(|j| {
                STENCIL
                    .iter()
                    .enumerate()
                    .map(move |(k, &s)| Triplet::new(j + k, j, s))
            })
            .collect()
    }

    /// Entries of `D·Dᵀ` (an `L × L` pentadiagonal matrix), one triplet
    /// per structural nonzero, both triangles included.
    ///
    /// Built as `Σ_j d_j·d_jᵀ` over the columns of [`Self::triplets`],
    /// accumulated into the five bands so no entry is emitted twice.
    pub fn gram_triplets(&self) -> Vec<Triplet<usize, usize, f64>> {
        let n = self.len;
        // bands[k][i] holds (D·Dᵀ)[i + k, i] for k = 0..=2
        let mut bands = [vec![0.0; n], vec![0.0; n], vec![0.0; n]];
        for column in self.triplets().chunks_exact(STENCIL.len()) {
            for a in column {
                for b in column.iter().filter(|b| b.row <= a.row) {
                    bands[a.row - b.row][b.row] += a.val * b.val;
                }
            }
        }

        let mut out = Vec::with_capacity(5 * n);
        for (k, band) in bands.iter().enumerate() {
            for (i, &v) in band.iter().enumerate().take(n - k) {
                out.push(Triplet::new(i + k, i, v));
                if k > 0 {
                    out.push(Triplet::new(i, i + k, v));
                }
            }
        }
        out
    }

    /// Discrete second-derivative energy `Σ (v[i] − 2v[i+1] + v[i+2])²`.
    pub fn roughness(&self, values: &[f64]) -> Result<f64> {
        if values.len() != self.len {
            return Err(invalid(format!(
                "expected {} values, got {}",
                self.len,
                values.len()
            )));
        }
        Ok(second_difference_energy(values))
    }
}

/// Sum of squared second differences of `values` (zero below three points).
pub(crate) fn second_difference_energy(values: &[f64]) -> f64 {
    values
        .windows(3)
        .map(|w| {
            let d = STENCIL[0] * w[0] + STENCIL[1] * w[1] + STENCIL[2] * w[2];
            d * d
        })
        .sum()
}
