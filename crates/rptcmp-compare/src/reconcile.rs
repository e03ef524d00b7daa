//! Row reconciliation for one section present in both reports.
//!
//! Rows are paired either by derived key ([`MatchStrategy::Keyed`]) or by
//! position ([`MatchStrategy::Positional`]). Paired rows are compared column
//! by column after whitespace normalization; unpaired rows are listed as
//! missing records.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use rptcmp_model::{CompareOptions, DeviationKind, Header, MatchStrategy, MessageGroup, Row};

use crate::aggregate::ComparisonRun;
use crate::catalog::KeyFn;
use crate::sections::numbered;

/// Columns shown when listing missing records, when the section has any.
const LISTING_COLUMNS: [&str; 6] = ["IP", "Network", "DNS", "NetBIOS", "OS", "QID"];

/// Pseudo-column for fields beyond the header width.
const OVERFLOW_COLUMN: &str = "Overflow";

/// Rows of one section on both sides, under the shared header.
#[derive(Debug, Clone, Copy)]
pub struct SectionRows<'a> {
    pub identity: &'a str,
    pub header: &'a Header,
    pub expected: &'a [Row],
    pub actual: &'a [Row],
}

/// Reconciles the rows of one section and records the outcome on `run`.
///
/// Under the keyed strategy without a key function only the record counts
/// are compared.
pub fn reconcile_rows(
    run: &mut ComparisonRun,
    rows: SectionRows<'_>,
    key_fn: Option<&KeyFn<'_>>,
    options: &CompareOptions,
) {
    let mut group = MessageGroup::new();
    check_record_count(run, &mut group, rows);

    match (options.strategy, key_fn) {
        (MatchStrategy::Keyed, Some(key_fn)) => reconcile_keyed(run, &mut group, rows, key_fn, options),
        (MatchStrategy::Keyed, None) => {
            tracing::debug!(section = rows.identity, "no layout matches section; rows not matched");
        }
        (MatchStrategy::Positional, _) => reconcile_positional(run, &mut group, rows, options),
    }

    run.push_group(group);
}

fn check_record_count(run: &mut ComparisonRun, group: &mut MessageGroup, rows: SectionRows<'_>) {
    let equal = rows.expected.len() == rows.actual.len();
    if !equal {
        group.deviation(
            DeviationKind::RecordCountDeviation,
            format!(
                "Section Title: [ {} ] | Expected Record count: [{}] | Actual Record count: [{}]",
                rows.identity,
                rows.expected.len(),
                rows.actual.len()
            ),
        );
    }
    run.push_flag(equal);
}

/// Keys every row of one side, keeping the first row of each key.
///
/// Returns the full key sequence and the first-wins rows in file order.
fn key_rows<'r>(
    rows: &'r [Row],
    key_fn: &KeyFn<'_>,
    side: &'static str,
) -> (Vec<String>, Vec<(String, &'r Row)>) {
    let mut sequence = Vec::with_capacity(rows.len());
    let mut unique = Vec::with_capacity(rows.len());
    let mut first_lines: BTreeMap<String, usize> = BTreeMap::new();

    for row in rows {
        let key = key_fn.key(row);
        sequence.push(key.clone());
        if let Some(first_line) = first_lines.get(&key) {
            tracing::warn!(
                side,
                line = row.line,
                first_line,
                layout = %key_fn.layout().name,
                "duplicate row key; keeping the first row"
            );
            continue;
        }
        first_lines.insert(key.clone(), row.line);
        unique.push((key, row));
    }
    (sequence, unique)
}

fn reconcile_keyed(
    run: &mut ComparisonRun,
    group: &mut MessageGroup,
    rows: SectionRows<'_>,
    key_fn: &KeyFn<'_>,
    options: &CompareOptions,
) {
    let (expected_sequence, expected) = key_rows(rows.expected, key_fn, "expected");
    let (actual_sequence, actual) = key_rows(rows.actual, key_fn, "actual");
    let actual_index: BTreeMap<&str, &Row> =
        actual.iter().map(|(key, row)| (key.as_str(), *row)).collect();
    let expected_index: BTreeMap<&str, &Row> =
        expected.iter().map(|(key, row)| (key.as_str(), *row)).collect();

    let missing_in_actual: Vec<&Row> = expected
        .iter()
        .filter(|(key, _)| !actual_index.contains_key(key.as_str()))
        .map(|(_, row)| *row)
        .collect();
    let missing_in_expected: Vec<&Row> = actual
        .iter()
        .filter(|(key, _)| !expected_index.contains_key(key.as_str()))
        .map(|(_, row)| *row)
        .collect();
    report_missing(run, group, rows.header, &missing_in_actual, &missing_in_expected);

    group.note("Comparison summary for Report records:");
    for (key, expected_row) in &expected {
        if let Some(actual_row) = actual_index.get(key.as_str()) {
            let passed = compare_row_values(group, rows.header, expected_row, actual_row, options);
            run.push_flag(passed);
        }
    }

    check_key_order(run, group, &expected_sequence, &actual_sequence);
}

/// Compares the populations of the two key sequences.
///
/// Differences here are already reported as missing records; this check is
/// kept as its own flag and message.
fn check_key_order(
    run: &mut ComparisonRun,
    group: &mut MessageGroup,
    expected: &[String],
    actual: &[String],
) {
    let expected: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
    let actual: BTreeSet<&str> = actual.iter().map(String::as_str).collect();
    let matching = expected == actual;
    if matching {
        group.note("Sort order in current section of Expected and Actual report is MATCHING");
    } else {
        group.deviation(
            DeviationKind::SortOrderDeviation,
            "Sort order in current section of Expected and Actual report is NOT MATCHING",
        );
    }
    run.push_flag(matching);
}

fn reconcile_positional(
    run: &mut ComparisonRun,
    group: &mut MessageGroup,
    rows: SectionRows<'_>,
    options: &CompareOptions,
) {
    let paired = rows.expected.len().min(rows.actual.len());
    let missing_in_actual: Vec<&Row> = rows.expected[paired..].iter().collect();
    let missing_in_expected: Vec<&Row> = rows.actual[paired..].iter().collect();
    report_missing(run, group, rows.header, &missing_in_actual, &missing_in_expected);

    group.note("Comparison summary for Report records:");
    for (expected_row, actual_row) in rows.expected.iter().zip(rows.actual) {
        let passed = compare_row_values(group, rows.header, expected_row, actual_row, options);
        run.push_flag(passed);
    }
}

fn report_missing(
    run: &mut ComparisonRun,
    group: &mut MessageGroup,
    header: &Header,
    missing_in_actual: &[&Row],
    missing_in_expected: &[&Row],
) {
    if !missing_in_actual.is_empty() {
        group.deviation(
            DeviationKind::MissingRecordDeviation,
            format!(
                "Records present in Expected report but absent in Actual report:{}",
                list_rows(header, missing_in_actual)
            ),
        );
    }
    if !missing_in_expected.is_empty() {
        group.deviation(
            DeviationKind::MissingRecordDeviation,
            format!(
                "Records present in Actual report but absent in Expected report:{}",
                list_rows(header, missing_in_expected)
            ),
        );
    }
    run.push_flag(missing_in_actual.is_empty() && missing_in_expected.is_empty());
}

fn list_rows(header: &Header, rows: &[&Row]) -> String {
    let items: Vec<String> = rows.iter().map(|row| describe_missing(header, row)).collect();
    numbered(&items)
}

fn describe_missing(header: &Header, row: &Row) -> String {
    let parts: Vec<String> = row
        .iter(header)
        .filter(|(column, _)| LISTING_COLUMNS.contains(&column.trim()))
        .map(|(column, value)| format!("{}: {}", column.trim(), value.unwrap_or("")))
        .collect();
    if parts.is_empty() {
        row.describe(header)
    } else {
        format!("Line {} | {}", row.line, parts.join(" | "))
    }
}

/// Strips line breaks and every other whitespace character.
pub fn normalize(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Compares two paired rows column by column; returns whether they agree.
fn compare_row_values(
    group: &mut MessageGroup,
    header: &Header,
    expected: &Row,
    actual: &Row,
    options: &CompareOptions,
) -> bool {
    let mut passed = true;
    let lines = format!(
        "Line in Expected report: {} ; Line in Actual report: {}",
        expected.line, actual.line
    );

    for (index, column) in header.columns().iter().enumerate() {
        let name = column.trim();
        if options.is_ignored(name) {
            continue;
        }
        match (expected.value(index), actual.value(index)) {
            (Some(_), None) => {
                group.deviation(
                    DeviationKind::ColumnDataDeviation(name.to_string()),
                    format!(
                        "{lines} | Column: {name} is present in Expected report, absent in Actual report"
                    ),
                );
                passed = false;
            }
            (exp, act) => {
                let (exp, act) = (exp.unwrap_or(""), act.unwrap_or(""));
                if normalize(exp) != normalize(act) {
                    group.deviation(
                        DeviationKind::ColumnDataDeviation(name.to_string()),
                        format!("{lines} | Column: {name} | Expected: [{exp}] Actual: [{act}]"),
                    );
                    passed = false;
                }
            }
        }
    }

    if !options.is_ignored(OVERFLOW_COLUMN) {
        let exp = expected.overflow.join(", ");
        let act = actual.overflow.join(", ");
        if normalize(&exp) != normalize(&act) {
            group.deviation(
                DeviationKind::ColumnDataDeviation(OVERFLOW_COLUMN.to_string()),
                format!("{lines} | Column: {OVERFLOW_COLUMN} | Expected: [{exp}] Actual: [{act}]"),
            );
            passed = false;
        }
    }
    passed
}
