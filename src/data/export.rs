use std::path::Path;

use serde::Serialize;

use crate::baseline::Correction;
use crate::error::{invalid, Result};

use super::model::Spectrum;

/// One output row. Field names become the CSV header.
#[derive(Debug, Serialize)]
struct CorrectedRow {
    #[serde(rename = "2theta")]
    angle: f64,
    intensity: f64,
    background: f64,
    corrected: f64,
}

/// Write a corrected pattern as CSV with columns
/// `2theta,intensity,background,corrected`.
pub fn write_correction_csv(path: &Path, spectrum: &Spectrum, correction: &Correction) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_rows(&mut writer, spectrum, correction)?;
    log::info!("Exported {} rows to {}", spectrum.len(), path.display());
    Ok(())
}

fn write_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    spectrum: &Spectrum,
    correction: &Correction,
) -> Result<()> {
    if correction.len() != spectrum.len() {
        return Err(invalid(format!(
            "correction has {} points but spectrum has {}",
            correction.len(),
            spectrum.len()
        )));
    }

    for i in 0..spectrum.len() {
        writer.serialize(CorrectedRow {
            angle: spectrum.angle()[i],
            intensity: spectrum.intensity()[i],
            background: correction.background[i],
            corrected: correction.corrected[i],
        })?;
    }
    writer.flush()?;
    Ok(())
}
