use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Library error type
// ---------------------------------------------------------------------------

/// Everything that can go wrong while loading or correcting a pattern.
///
/// Errors are returned to the caller as soon as they occur; no operation
/// hands back a partial result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A data line could not be read as `<angle> <intensity>`.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A length or parameter constraint was violated.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The linear system could not be factorized.
    #[error("numerical failure: {0}")]
    Numerical(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Shorthand for building an [`AnalysisError::InvalidInput`].
pub(crate) fn invalid(message: impl Into<String>) -> AnalysisError {
    AnalysisError::InvalidInput(message.into())
}
