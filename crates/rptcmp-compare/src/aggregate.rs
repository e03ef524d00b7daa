//! Run-scoped accumulation of flags, message groups and section outcomes.

use rptcmp_model::{ComparisonResult, MessageGroup, SectionOutcome};

/// Mutable state of one comparison run.
///
/// Every check receives `&mut ComparisonRun`; [`ComparisonRun::finish`]
/// freezes it into a [`ComparisonResult`].
#[derive(Debug, Default)]
pub struct ComparisonRun {
    flags: Vec<bool>,
    groups: Vec<MessageGroup>,
    sections: Vec<SectionOutcome>,
    expected_sections: usize,
    actual_sections: usize,
    expected_records: usize,
    actual_records: usize,
}

impl ComparisonRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section_counts(mut self, expected: usize, actual: usize) -> Self {
        self.expected_sections = expected;
        self.actual_sections = actual;
        self
    }

    pub fn with_record_counts(mut self, expected: usize, actual: usize) -> Self {
        self.expected_records = expected;
        self.actual_records = actual;
        self
    }

    pub fn push_flag(&mut self, passed: bool) {
        self.flags.push(passed);
    }

    /// Appends a message group; empty groups are dropped.
    pub fn push_group(&mut self, group: MessageGroup) {
        if !group.is_empty() {
            self.groups.push(group);
        }
    }

    pub fn push_section(&mut self, outcome: SectionOutcome) {
        self.sections.push(outcome);
    }

    /// Deviation lines recorded so far.
    pub fn deviation_count(&self) -> usize {
        self.groups
            .iter()
            .map(|group| group.deviations().count())
            .sum()
    }

    /// Logical AND of the flags recorded so far.
    pub fn passed(&self) -> bool {
        self.flags.iter().all(|flag| *flag)
    }

    pub fn finish(self) -> ComparisonResult {
        ComparisonResult {
            flags: self.flags,
            groups: self.groups,
            sections: self.sections,
            expected_sections: self.expected_sections,
            actual_sections: self.actual_sections,
            expected_records: self.expected_records,
            actual_records: self.actual_records,
        }
    }
}
