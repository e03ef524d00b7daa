//! Section existence and column header checks.

use rptcmp_model::{CompareOptions, DeviationKind, Header, MessageGroup, Report};

use crate::aggregate::ComparisonRun;

/// Records sections present on one side only.
///
/// With `skip_title_section`, the first expected section is exempt.
pub fn compare_section_sets(
    run: &mut ComparisonRun,
    expected: &Report,
    actual: &Report,
    options: &CompareOptions,
) {
    let mut group = MessageGroup::new();
    group.note("Section comparison summary:");
    group.note(format!(
        "Number of sections in Expected report: {}",
        expected.len()
    ));
    group.note(format!(
        "Number of sections in Actual report: {}",
        actual.len()
    ));

    let skip = usize::from(options.skip_title_section);
    let missing_in_actual = missing_sections(expected, actual, skip);
    let missing_in_expected = missing_sections(actual, expected, 0);

    if !missing_in_actual.is_empty() {
        tracing::debug!(count = missing_in_actual.len(), "sections missing in actual");
        group.deviation(
            DeviationKind::ReportSectionDeviation,
            format!(
                "Following sections are present in Expected report and absent in Actual report:{}",
                numbered(&missing_in_actual)
            ),
        );
    }
    if !missing_in_expected.is_empty() {
        tracing::debug!(count = missing_in_expected.len(), "sections missing in expected");
        group.deviation(
            DeviationKind::ReportSectionDeviation,
            format!(
                "Following sections are present in Actual report and absent in Expected report:{}",
                numbered(&missing_in_expected)
            ),
        );
    }

    run.push_flag(missing_in_actual.is_empty() && missing_in_expected.is_empty());
    run.push_group(group);
}

fn missing_sections(from: &Report, other: &Report, skip: usize) -> Vec<String> {
    from.iter()
        .skip(skip)
        .filter(|(identity, _)| !other.contains(identity))
        .map(|(identity, _)| identity)
        .collect()
}

/// `\n[1] a\n[2] b` listing used inside multi-line deviation details.
pub(crate) fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| format!("\n[{}] {}", index + 1, item))
        .collect()
}

/// Compares raw headers; returns whether rows may be compared.
pub fn compare_headers(run: &mut ComparisonRun, expected: &Header, actual: &Header) -> bool {
    let mut group = MessageGroup::new();
    group.note("Comparing column headers:");
    let mut passed = true;

    if expected.len() != actual.len() {
        group.deviation(
            DeviationKind::ColumnHeaderDeviation,
            format!(
                "Expected Column count: [{}] | Actual Column count: [{}]",
                expected.len(),
                actual.len()
            ),
        );
        passed = false;
    }

    let actual_list = actual.columns().join(", ");
    for (index, (exp, act)) in expected
        .columns()
        .iter()
        .zip(actual.columns())
        .enumerate()
    {
        if exp != act {
            group.deviation(
                DeviationKind::ColumnHeaderDeviation,
                format!(
                    "Column {}: Expected Column: [{}] not matching Actual Column list: [{}]",
                    index + 1,
                    exp,
                    actual_list
                ),
            );
            passed = false;
        }
    }

    if passed {
        group.note("No deviation found in column headers");
    }
    run.push_flag(passed);
    run.push_group(group);
    passed
}
