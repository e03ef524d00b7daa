//! Queries against a written summary document.

use std::fmt;
use std::path::Path;

use rptcmp_model::SUCCESS_MESSAGE;

use crate::error::{ReportError, Result};

/// A line carrying one of these ends the search.
const BLOCKING_MARKERS: [&str; 2] = ["Column_Header_Deviation", "Report_files_not_present"];

/// Result of scanning a summary for a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The first line containing the term.
    Found { line: String },
    /// A blocking marker appeared before the term.
    Blocked { marker: String, line: String },
    NotFound,
    EmptySummary,
}

impl SearchOutcome {
    /// True unless the term is known to be absent.
    pub fn is_deviation_present(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found { line } => write!(f, "found: {line}"),
            Self::Blocked { marker, line } => {
                write!(f, "{marker} present in summary, search not performed: {line}")
            }
            Self::NotFound => f.write_str("not found"),
            Self::EmptySummary => f.write_str("summary file is empty"),
        }
    }
}

/// Scans summary text line by line for `term`.
pub fn search_text(text: &str, term: &str) -> SearchOutcome {
    if text.trim().is_empty() {
        return SearchOutcome::EmptySummary;
    }
    for line in text.lines() {
        if let Some(marker) = BLOCKING_MARKERS.iter().find(|marker| line.contains(**marker)) {
            return SearchOutcome::Blocked {
                marker: (*marker).to_string(),
                line: line.to_string(),
            };
        }
        if line.contains(term) {
            return SearchOutcome::Found {
                line: line.to_string(),
            };
        }
    }
    SearchOutcome::NotFound
}

fn read_summary(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReportError::SummaryNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ReportError::SummaryRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Searches the summary file at `path` for `term`.
pub fn search_summary(path: &Path, term: &str) -> Result<SearchOutcome> {
    let outcome = search_text(&read_summary(path)?, term);
    tracing::debug!(path = %path.display(), present = outcome.is_deviation_present(), "summary searched");
    Ok(outcome)
}

/// Shorthand for `search_summary(..)?.is_deviation_present()`.
pub fn is_deviation_present(path: &Path, term: &str) -> Result<bool> {
    Ok(search_summary(path, term)?.is_deviation_present())
}

/// Whether the summary at `path` records an overall pass.
pub fn summary_passed(path: &Path) -> Result<bool> {
    Ok(read_summary(path)?
        .lines()
        .any(|line| line.contains(SUCCESS_MESSAGE)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "\
Overall Comparison status:
Deviations observed in report data
[Column_Data_Deviation_Security_Risk] Line in Expected report: 6 ; Line in Actual report: 6 | Column: Security Risk | Expected: [High] Actual: [Critical]
";

    #[test]
    fn test_found() {
        let outcome = search_text(SUMMARY, "Security_Risk");
        assert!(matches!(outcome, SearchOutcome::Found { ref line } if line.contains("Expected: [High]")));
        assert!(outcome.is_deviation_present());
    }

    #[test]
    fn test_not_found() {
        let outcome = search_text(SUMMARY, "Column_Data_Deviation_OS");
        assert_eq!(outcome, SearchOutcome::NotFound);
        assert!(!outcome.is_deviation_present());
    }

    #[test]
    fn test_blocked_by_header_deviation() {
        let text = "[Column_Header_Deviation] Expected Column count: [4] | Actual Column count: [3]\n[Column_Data_Deviation_OS] x\n";
        let outcome = search_text(text, "Column_Data_Deviation_OS");
        assert!(matches!(
            outcome,
            SearchOutcome::Blocked { ref marker, .. } if marker == "Column_Header_Deviation"
        ));
        assert!(outcome.is_deviation_present());
    }

    #[test]
    fn test_term_before_blocking_marker() {
        let text = "[Column_Data_Deviation_OS] x\n[Report_files_not_present] y\n";
        assert!(matches!(
            search_text(text, "Column_Data_Deviation_OS"),
            SearchOutcome::Found { .. }
        ));
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(search_text(" \n", "anything"), SearchOutcome::EmptySummary);
        assert!(SearchOutcome::EmptySummary.is_deviation_present());
    }

    #[test]
    fn test_missing_summary_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = search_summary(&dir.path().join("none.txt"), "x").unwrap_err();
        assert!(matches!(err, ReportError::SummaryNotFound { .. }));
    }

    #[test]
    fn test_summary_passed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");
        std::fs::write(&path, SUMMARY).unwrap();
        assert!(!summary_passed(&path).unwrap());
        std::fs::write(&path, format!("{SUCCESS_MESSAGE}\n")).unwrap();
        assert!(summary_passed(&path).unwrap());
    }
}
