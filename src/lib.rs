//! Baseline removal for one-dimensional diffraction patterns.
//!
//! Load a `2theta`/`intensity` text file with [`load_data`], then remove the
//! background with one of:
//!
//! * [`baseline_als`] – asymmetric least squares (returns the baseline)
//! * [`savgol_correct`] – Savitzky-Golay smoothing
//! * [`median_correct`] – sliding median
//! * [`linear_correct`] – line through the first and last sample
//!
//! Every call is independent and keeps no state, so separate patterns can
//! be processed on separate threads without coordination.

pub mod baseline;
pub mod data;
pub mod error;
pub mod settings;

pub use baseline::als::{baseline_als, whittaker_smooth, AlsFit, AlsParams};
pub use baseline::linear::linear_correct;
pub use baseline::median::median_correct;
pub use baseline::savgol::savgol_correct;
pub use baseline::{Correction, CorrectionMethod};
pub use data::export::write_correction_csv;
pub use data::loader::load_data;
pub use data::model::Spectrum;
pub use error::{AnalysisError, Result};
pub use settings::Settings;
