/// Data layer: the pattern type, text loading, and CSV export.
///
/// Architecture:
/// ```text
///  header + "<2theta> <intensity>" lines
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  skip header, parse pairs → Spectrum
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Spectrum  │  angle + intensity columns
///   └──────────┘
///        │  (baseline correction happens elsewhere)
///        ▼
///   ┌──────────┐
///   │  export   │  2theta, intensity, background, corrected → .csv
///   └──────────┘
/// ```

pub mod export;
pub mod loader;
pub mod model;
