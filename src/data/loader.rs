use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{AnalysisError, Result};

use super::model::Spectrum;

/// Number of header lines skipped when the caller does not say otherwise.
pub const DEFAULT_HEADER_LINES: usize = 12;

/// Pattern read when no path is given.
pub const DEFAULT_DATA_PATH: &str = "../data/300_750.txt";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a diffraction pattern from a whitespace-delimited text file.
///
/// The first `header_lines` lines (default [`DEFAULT_HEADER_LINES`]) are
/// skipped unread. Every remaining non-blank line must hold exactly two
/// numbers, `<2theta> <intensity>`, separated by any run of spaces or tabs.
///
/// With `path = None` the file at [`DEFAULT_DATA_PATH`] is read.
pub fn load_data(path: Option<&Path>, header_lines: Option<usize>) -> Result<Spectrum> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_DATA_PATH));
    let header_lines = header_lines.unwrap_or(DEFAULT_HEADER_LINES);

    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AnalysisError::NotFound {
            path: path.to_path_buf(),
        },
        _ => AnalysisError::Io(e),
    })?;

    let mut spectrum = parse_pattern(BufReader::new(file), header_lines)?;
    spectrum.source = Some(path.to_path_buf());

    log::info!(
        "Loaded {} points from {} (skipped {header_lines} header lines)",
        spectrum.len(),
        path.display()
    );
    Ok(spectrum)
}

/// Parse pattern text from any buffered reader.
///
/// Header lines are skipped without being decoded, so a header in a legacy
/// encoding does not break the read.
pub fn parse_pattern<R: BufRead>(mut reader: R, header_lines: usize) -> Result<Spectrum> {
    let mut raw = Vec::new();
    let mut line_no = 0usize;

    for _ in 0..header_lines {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        line_no += 1;
    }

    let mut pairs = Vec::new();
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        line_no += 1;
        let line = std::str::from_utf8(&raw).map_err(|_| AnalysisError::Parse {
            line: line_no,
            message: "not valid UTF-8".into(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        pairs.push(parse_pair(line, line_no)?);
    }

    Ok(Spectrum::from_pairs(pairs))
}

// -- helpers --

fn parse_pair(line: &str, line_no: usize) -> Result<(f64, f64)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [angle, intensity] = fields.as_slice() else {
        return Err(AnalysisError::Parse {
            line: line_no,
            message: format!("expected 2 fields, found {}", fields.len()),
        });
    };
    Ok((
        parse_field(angle, line_no, "2theta")?,
        parse_field(intensity, line_no, "intensity")?,
    ))
}

fn parse_field(tok: &str, line_no: usize, col: &str) -> Result<f64> {
    tok.parse::<f64>().map_err(|_| AnalysisError::Parse {
        line: line_no,
        message: format!("{col}: '{tok}' is not a number"),
    })
}
