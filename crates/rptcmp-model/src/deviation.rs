//! Deviation taxonomy and summary message lines.

use std::fmt;

use serde::{Deserialize, Serialize};

const COLUMN_DATA_PREFIX: &str = "Column_Data_Deviation_";

/// Closed set of discrepancy kinds a comparison run can record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "column", rename_all = "snake_case")]
pub enum DeviationKind {
    /// One or both input reports are missing.
    ReportFilesNotPresent,
    /// Section or whole-report row counts differ.
    RecordCountDeviation,
    /// Header length or per-column name mismatch.
    ColumnHeaderDeviation,
    /// A section is present on one side only.
    ReportSectionDeviation,
    /// Rows whose key exists on one side only.
    MissingRecordDeviation,
    /// A value mismatch in the named column of a matched row.
    ColumnDataDeviation(String),
    /// Matched-key populations differ at the order check.
    SortOrderDeviation,
    /// The comparison could not complete (I/O, parse or catalog failure).
    ComparisonError,
}

impl DeviationKind {
    /// Greppable marker written in front of the deviation detail.
    pub fn marker(&self) -> String {
        match self {
            Self::ReportFilesNotPresent => "Report_files_not_present".to_string(),
            Self::RecordCountDeviation => "Record_Count_Deviation".to_string(),
            Self::ColumnHeaderDeviation => "Column_Header_Deviation".to_string(),
            Self::ReportSectionDeviation => "Report_Section_Deviation".to_string(),
            Self::MissingRecordDeviation => "Missing_Record_Deviation".to_string(),
            Self::ColumnDataDeviation(column) => column_data_marker(column),
            Self::SortOrderDeviation => "Sort_Order_Deviation".to_string(),
            Self::ComparisonError => "Comparison_Error".to_string(),
        }
    }
}

/// `Column_Data_Deviation_<column>` with spaces replaced by underscores.
pub fn column_data_marker(column: &str) -> String {
    format!("{COLUMN_DATA_PREFIX}{}", column.trim().replace(' ', "_"))
}

const FIXED_MARKERS: [&str; 7] = [
    "Report_files_not_present",
    "Record_Count_Deviation",
    "Column_Header_Deviation",
    "Report_Section_Deviation",
    "Missing_Record_Deviation",
    "Sort_Order_Deviation",
    "Comparison_Error",
];

/// True when `text` carries any deviation marker.
pub fn contains_marker(text: &str) -> bool {
    text.contains(COLUMN_DATA_PREFIX) || FIXED_MARKERS.iter().any(|marker| text.contains(marker))
}

/// A recorded discrepancy between expected and actual content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deviation {
    pub kind: DeviationKind,
    pub detail: String,
}

impl Deviation {
    pub fn new(kind: DeviationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Deviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.marker(), self.detail)
    }
}

/// One line of the summary document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLine {
    Note(String),
    Deviation(Deviation),
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note(text) => f.write_str(text),
            Self::Deviation(deviation) => deviation.fmt(f),
        }
    }
}

/// Ordered lines produced by one check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageGroup {
    pub lines: Vec<SummaryLine>,
}

impl MessageGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(&mut self, text: impl Into<String>) {
        self.lines.push(SummaryLine::Note(text.into()));
    }

    pub fn deviation(&mut self, kind: DeviationKind, detail: impl Into<String>) {
        self.lines
            .push(SummaryLine::Deviation(Deviation::new(kind, detail)));
    }

    pub fn deviations(&self) -> impl Iterator<Item = &Deviation> {
        self.lines.iter().filter_map(|line| match line {
            SummaryLine::Deviation(deviation) => Some(deviation),
            SummaryLine::Note(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_marker_replaces_spaces() {
        let kind = DeviationKind::ColumnDataDeviation("Security Risk".to_string());
        assert_eq!(kind.marker(), "Column_Data_Deviation_Security_Risk");
    }

    #[test]
    fn deviation_display_brackets_marker() {
        let deviation = Deviation::new(
            DeviationKind::RecordCountDeviation,
            "Expected Record count: [2] | Actual Record count: [3]",
        );
        assert_eq!(
            deviation.to_string(),
            "[Record_Count_Deviation] Expected Record count: [2] | Actual Record count: [3]"
        );
    }

    #[test]
    fn marker_detection() {
        assert!(contains_marker("[Column_Data_Deviation_QID] Line ..."));
        assert!(contains_marker("[Sort_Order_Deviation] NOT MATCHING"));
        assert!(!contains_marker("No deviation found in column headers"));
        assert!(!contains_marker(
            "Sort order in current section of Expected and Actual report is MATCHING"
        ));
    }

    #[test]
    fn group_counts_only_deviations() {
        let mut group = MessageGroup::new();
        group.note("Comparing column headers:");
        group.deviation(DeviationKind::ColumnHeaderDeviation, "count differs");
        assert_eq!(group.deviations().count(), 1);
        assert_eq!(group.lines.len(), 2);
    }
}
