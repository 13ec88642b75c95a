use xrd_baseline::baseline::difference::SecondDifference;
use xrd_baseline::{Correction, CorrectionMethod, Settings, Spectrum};

use crate::color::TraceColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded pattern (None until user loads a file).
    pub spectrum: Option<Spectrum>,

    /// Header count and active correction.
    pub settings: Settings,

    /// Result of the last successful correction.
    pub correction: Option<Correction>,

    /// Second-difference energy of the current background.
    pub roughness: Option<f64>,

    /// Which traces are drawn.
    pub show_raw: bool,
    pub show_background: bool,
    pub show_corrected: bool,

    pub colors: TraceColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            spectrum: None,
            settings: Settings::default(),
            correction: None,
            roughness: None,
            show_raw: true,
            show_background: true,
            show_corrected: true,
            colors: TraceColors::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded pattern and correct it with the current method.
    pub fn set_spectrum(&mut self, spectrum: Spectrum) {
        self.spectrum = Some(spectrum);
        self.status_message = None;
        self.recompute();
    }

    /// Switch method (or its parameters) and recompute.
    pub fn set_method(&mut self, method: CorrectionMethod) {
        self.settings.method = method;
        self.recompute();
    }

    /// Replace all settings, e.g. after loading them from disk.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.recompute();
    }

    /// Re-run the active correction on the loaded pattern.
    pub fn recompute(&mut self) {
        let Some(sp) = &self.spectrum else {
            return;
        };

        match self.settings.method.apply(sp.angle(), sp.intensity()) {
            Ok(correction) => {
                self.roughness = background_roughness(&correction.background);
                self.correction = Some(correction);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("{} failed: {e:#}", self.settings.method.label());
                self.status_message = Some(format!("Error: {e}"));
                self.correction = None;
                self.roughness = None;
            }
        }
    }
}

/// Roughness of a background, `None` below three points.
fn background_roughness(background: &[f64]) -> Option<f64> {
    SecondDifference::new(background.len())
        .and_then(|op| op.roughness(background))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xrd_baseline::baseline::median::MedianParams;

    fn spectrum() -> Spectrum {
        Spectrum::from_pairs((0..20).map(|i| (i as f64, if i == 10 { 9.0 } else { 1.0 })))
    }

    #[test]
    fn loading_a_pattern_runs_the_correction() {
        let mut state = AppState::default();
        state.set_spectrum(spectrum());
        assert!(state.correction.is_some());
        assert!(state.roughness.is_some());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn roughness_is_that_of_the_background() {
        let mut state = AppState::default();
        state.set_spectrum(spectrum());
        let background = &state.correction.as_ref().unwrap().background;
        let expected = SecondDifference::new(background.len())
            .unwrap()
            .roughness(background)
            .unwrap();
        assert_eq!(state.roughness, Some(expected));
    }

    #[test]
    fn two_point_pattern_has_no_roughness() {
        assert_eq!(background_roughness(&[1.0, 2.0]), None);
        assert_eq!(background_roughness(&[0.0, 1.0, 0.0]), Some(4.0));
    }

    #[test]
    fn invalid_parameters_clear_the_result_and_report() {
        let mut state = AppState::default();
        state.set_spectrum(spectrum());
        state.set_method(CorrectionMethod::Median(MedianParams { kernel_size: 4 }));
        assert!(state.correction.is_none());
        assert!(state.status_message.is_some());

        state.set_method(CorrectionMethod::Median(MedianParams { kernel_size: 3 }));
        let c = state.correction.as_ref().unwrap();
        assert_eq!(c.corrected[10], 8.0);
    }
}
