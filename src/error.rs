//! Error types shared by the split, convert and resize operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::operations::FileOpError;

/// Errors that abort an operation before or during its setup phase.
///
/// Failures on individual files are not reported through this type; they are
/// recorded in the statistics returned by each operation.
#[derive(Debug, Error)]
pub enum PrepError {
    /// Split ratios do not add up to 1.0.
    #[error("Split ratios must sum to 1.0 (got {sum:.4})")]
    InvalidRatios { sum: f64 },

    /// One of the split ratios is negative.
    #[error("Ratio '{name}' must not be negative (got {value})")]
    NegativeRatio { name: &'static str, value: f64 },

    /// The input directory does not exist.
    #[error("Input directory does not exist: {0:?}")]
    MissingInputDir(PathBuf),

    /// A path that should be a directory is something else.
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    /// I/O failure on a specific path.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output tree could not be prepared.
    #[error(transparent)]
    FileOp(#[from] FileOpError),

    /// Settings file could not be written or its location resolved.
    #[error("Settings error: {0}")]
    Settings(String),
}

impl PrepError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrepError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for dataset preparation operations.
pub type PrepResult<T> = std::result::Result<T, PrepError>;
