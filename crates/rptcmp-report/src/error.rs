use std::path::PathBuf;
use thiserror::Error;

/// Errors writing or reading a summary document.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write summary {path}: {source}")]
    SummaryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read summary {path}: {source}")]
    SummaryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("summary not found: {path}")]
    SummaryNotFound { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, ReportError>;
