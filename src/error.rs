// ==============================================================================
// error.rs - Error taxonomy
// ==============================================================================
// Description: Fatal error kinds for the AN averaging pipeline
// Created: 2026-10-18
// Version: 0.1.0
// ==============================================================================

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an AN averaging run
///
/// Every variant is fatal. Record-level variants carry the 1-based line
/// number of the input line that triggered them.
#[derive(Error, Debug)]
pub enum AnMeanError {
    #[error("IO error reading {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Decompression error: {0}")]
    Decompression(String),

    #[error("Invalid VCF header: {0}")]
    Schema(String),

    #[error("Failed to parse VCF record at line {line}: {message}")]
    RecordParse { line: usize, message: String },

    #[error("Missing required INFO field {key} at line {line}")]
    MissingField { line: usize, key: String },

    #[error("No AN values were accumulated; mean is undefined")]
    DivisionByZero,
}

impl AnMeanError {
    /// Classify an IO error raised while pulling bytes through the decoder
    ///
    /// flate2 reports corrupt framing as `InvalidInput`/`InvalidData` and a
    /// truncated stream as `UnexpectedEof`; anything else came from the file.
    pub fn from_stream(path: impl Into<PathBuf>, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::InvalidInput
            | io::ErrorKind::InvalidData
            | io::ErrorKind::UnexpectedEof => AnMeanError::Decompression(err.to_string()),
            _ => AnMeanError::Io {
                path: path.into(),
                source: err,
            },
        }
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AnMeanError::Io { .. } => "io",
            AnMeanError::Decompression(_) => "decompression",
            AnMeanError::Schema(_) => "schema",
            AnMeanError::RecordParse { .. } => "record_parse",
            AnMeanError::MissingField { .. } => "missing_field",
            AnMeanError::DivisionByZero => "division_by_zero",
        }
    }
}
