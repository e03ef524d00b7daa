use serde::{Deserialize, Serialize};

use crate::deviation::{Deviation, DeviationKind, MessageGroup, SummaryLine, contains_marker};

/// How a section fared in the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    /// Present on both sides with no deviations.
    Matched,
    /// Present on both sides with row-level deviations.
    Deviations,
    /// Headers differ; rows were not compared.
    HeaderMismatch,
    /// Present in the expected report only.
    MissingInActual,
    /// Present in the actual report only.
    MissingInExpected,
}

impl SectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Deviations => "deviations",
            Self::HeaderMismatch => "header mismatch",
            Self::MissingInActual => "missing in actual",
            Self::MissingInExpected => "missing in expected",
        }
    }
}

/// Per-section outcome for tabular overviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOutcome {
    pub identity: String,
    pub status: SectionStatus,
    /// Catalog layout used for row keys, if any.
    pub layout: Option<String>,
    pub expected_rows: usize,
    pub actual_rows: usize,
    pub deviations: usize,
}

/// Everything a comparison run found, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub flags: Vec<bool>,
    pub groups: Vec<MessageGroup>,
    pub sections: Vec<SectionOutcome>,
    pub expected_sections: usize,
    pub actual_sections: usize,
    pub expected_records: usize,
    pub actual_records: usize,
}

impl ComparisonResult {
    /// Result for a run that could not start because an input is missing.
    pub fn files_not_present() -> Self {
        let mut group = MessageGroup::new();
        group.deviation(
            DeviationKind::ReportFilesNotPresent,
            "Expected or Actual file is not present at given location",
        );
        Self {
            flags: vec![false],
            groups: vec![group],
            ..Self::default()
        }
    }

    /// Result for a run aborted by an I/O, parse or catalog failure.
    pub fn failed(reason: impl Into<String>) -> Self {
        let mut group = MessageGroup::new();
        group.deviation(DeviationKind::ComparisonError, reason);
        Self {
            flags: vec![false],
            groups: vec![group],
            ..Self::default()
        }
    }

    /// Logical AND of every recorded flag.
    pub fn verdict(&self) -> bool {
        self.flags.iter().all(|flag| *flag)
    }

    /// True when any deviation line carries a deviation marker.
    ///
    /// Notes are not scanned, so section banners quoting a header never count.
    /// Agrees with `!verdict()` for results built by the comparison engine.
    pub fn has_deviation_lines(&self) -> bool {
        self.lines().any(|line| match line {
            SummaryLine::Deviation(deviation) => contains_marker(&deviation.to_string()),
            SummaryLine::Note(_) => false,
        })
    }

    pub fn deviations(&self) -> impl Iterator<Item = &Deviation> {
        self.groups.iter().flat_map(MessageGroup::deviations)
    }

    pub fn deviation_count(&self) -> usize {
        self.deviations().count()
    }

    /// All lines in order, flattened across groups.
    pub fn lines(&self) -> impl Iterator<Item = &SummaryLine> {
        self.groups.iter().flat_map(|group| group.lines.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_not_present_fails() {
        let result = ComparisonResult::files_not_present();
        assert!(!result.verdict());
        assert!(result.has_deviation_lines());
        let first = result.lines().next().expect("one line").to_string();
        assert!(first.starts_with("[Report_files_not_present]"));
    }

    #[test]
    fn marker_text_in_notes_is_not_a_deviation() {
        let mut group = MessageGroup::new();
        group.note("[Host|Sort_Order_Deviation|Column_Data_Deviation_OS]");
        group.note("No deviation found in column headers");
        let result = ComparisonResult {
            flags: vec![true, true],
            groups: vec![group],
            ..ComparisonResult::default()
        };
        assert!(result.verdict());
        assert!(!result.has_deviation_lines());
    }

    #[test]
    fn empty_result_passes() {
        let result = ComparisonResult::default();
        assert!(result.verdict());
        assert!(!result.has_deviation_lines());
    }
}
