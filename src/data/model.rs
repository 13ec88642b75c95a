use std::path::PathBuf;

/// Column label of the diffraction angle axis.
pub const ANGLE_COLUMN: &str = "2theta";
/// Column label of the measured intensity.
pub const INTENSITY_COLUMN: &str = "intensity";

// ---------------------------------------------------------------------------
// Spectrum – one loaded diffraction pattern
// ---------------------------------------------------------------------------

/// A single diffraction pattern: `(2theta, intensity)` pairs in file order.
///
/// The angle axis is expected to be strictly increasing but this is not
/// enforced. The two columns always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    angle: Vec<f64>,
    intensity: Vec<f64>,
    /// File the pattern was read from, if any.
    pub source: Option<PathBuf>,
}

impl Spectrum {
    /// Build a spectrum from already-parsed `(angle, intensity)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (angle, intensity) = pairs.into_iter().unzip();
        Spectrum {
            angle,
            intensity,
            source: None,
        }
    }

    /// Diffraction angle column (`2theta`).
    pub fn angle(&self) -> &[f64] {
        &self.angle
    }

    /// Intensity column.
    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    /// Look up a column by its label.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        match name {
            ANGLE_COLUMN => Some(&self.angle),
            INTENSITY_COLUMN => Some(&self.intensity),
            _ => None,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.angle.len()
    }

    /// Whether the pattern has no samples.
    pub fn is_empty(&self) -> bool {
        self.angle.is_empty()
    }

    /// `(min, max)` of the angle axis, or `None` when empty.
    pub fn angle_range(&self) -> Option<(f64, f64)> {
        let first = *self.angle.first()?;
        Some(
            self.angle
                .iter()
                .fold((first, first), |(lo, hi), &a| (lo.min(a), hi.max(a))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_addressable_by_label() {
        let sp = Spectrum::from_pairs([(10.0, 1.0), (10.5, 3.0)]);
        assert_eq!(sp.column("2theta"), Some(&[10.0, 10.5][..]));
        assert_eq!(sp.column("intensity"), Some(&[1.0, 3.0][..]));
        assert_eq!(sp.column("x"), None);
        assert_eq!(sp.len(), 2);
        assert_eq!(sp.angle_range(), Some((10.0, 10.5)));
    }

    #[test]
    fn empty_spectrum_has_no_range() {
        let sp = Spectrum::from_pairs(Vec::new());
        assert!(sp.is_empty());
        assert_eq!(sp.angle_range(), None);
    }
}
