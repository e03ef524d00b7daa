//! Error types for report ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a report.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Report file not found.
    #[error("report file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File uses an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// File is not valid UTF-8.
    #[error("invalid UTF-8 in {path}: {source}")]
    InvalidUtf8 {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Malformed CSV record.
    #[error("failed to parse CSV {origin} at line {line}: {source}")]
    CsvParse {
        origin: String,
        line: usize,
        #[source]
        source: csv::Error,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
