use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::baseline::CorrectionMethod;
use crate::data::loader::DEFAULT_HEADER_LINES;
use crate::error::Result;

/// Processing settings the viewer can save and restore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Header lines skipped when opening a pattern.
    pub header_lines: usize,
    /// Active correction and its parameters.
    pub method: CorrectionMethod,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            header_lines: DEFAULT_HEADER_LINES,
            method: CorrectionMethod::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&text)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        log::info!("Saved settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::savgol::SavgolParams;
    use crate::error::AnalysisError;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let s: Settings = serde_json::from_str(r#"{"header_lines": 3}"#).unwrap();
        assert_eq!(s.header_lines, 3);
        assert_eq!(s.method, CorrectionMethod::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let s = Settings {
            header_lines: 0,
            method: CorrectionMethod::Savgol(SavgolParams {
                window_length: 21,
                polyorder: 3,
            }),
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
    }

    #[test]
    fn malformed_json_is_a_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(AnalysisError::Settings(_))));
    }
}
