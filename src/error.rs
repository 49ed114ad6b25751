//! Error types for capture processing.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures while normalizing, parsing or writing a capture.
///
/// Malformed rows and non-numeric tokens are not errors; they are
/// skipped during parsing and aggregation.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// A capture file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A capture, CSV or report file could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV sink rejected a record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input path is missing or not a directory.
    #[error("Input is not a directory: {0}")]
    InputNotDirectory(PathBuf),
}

impl CaptureError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CaptureError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CaptureError::Write {
            path: path.into(),
            source,
        }
    }
}
