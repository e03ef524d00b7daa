//! Report file loading with encoding checks.

use std::path::Path;

use rptcmp_model::{ParseOptions, Report};

use crate::error::{IngestError, Result};
use crate::sections::parse_report;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Reads and parses a report file.
///
/// The whole file is loaded into memory; a UTF-8 BOM is stripped.
pub fn read_report(path: &Path, options: &ParseOptions) -> Result<Report> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    validate_encoding(path, &bytes)?;

    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes.as_slice());
    let text = std::str::from_utf8(content).map_err(|source| IngestError::InvalidUtf8 {
        path: path.to_path_buf(),
        source,
    })?;

    let report = parse_report(text, options, &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        sections = report.len(),
        rows = report.total_rows(),
        "report parsed"
    );
    Ok(report)
}

/// Rejects UTF-16 input, which the CSV reader would silently mangle.
pub fn validate_encoding(path: &Path, bytes: &[u8]) -> Result<()> {
    if bytes.len() >= 2 {
        // UTF-16 LE BOM
        if bytes[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        // UTF-16 BE BOM
        if bytes[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}
