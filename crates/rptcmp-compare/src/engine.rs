//! Whole-report comparison.

use std::time::Instant;

use rptcmp_model::{
    CompareOptions, ComparisonResult, DeviationKind, MatchStrategy, MessageGroup, Report, Section,
    SectionOutcome, SectionStatus,
};
use tracing::{debug, info, info_span};

use crate::aggregate::ComparisonRun;
use crate::catalog::LayoutCatalog;
use crate::error::CompareError;
use crate::reconcile::{SectionRows, reconcile_rows};
use crate::sections::{compare_headers, compare_section_sets};

const BANNER_WIDTH: usize = 100;

/// Compares `actual` against `expected`.
///
/// Findings are recorded in the returned result; only a header that matches
/// two unrelated catalog layouts aborts the run.
pub fn compare_reports(
    expected: &Report,
    actual: &Report,
    catalog: &LayoutCatalog,
    options: &CompareOptions,
) -> Result<ComparisonResult, CompareError> {
    let span = info_span!(
        "compare",
        expected_sections = expected.len(),
        actual_sections = actual.len()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let mut run = ComparisonRun::new()
        .with_section_counts(expected.len(), actual.len())
        .with_record_counts(expected.total_rows(), actual.total_rows());

    compare_record_totals(&mut run, expected, actual);
    compare_section_sets(&mut run, expected, actual, options);

    for (identity, expected_section) in expected.iter() {
        let outcome = match actual.get(&identity) {
            Some(actual_section) => {
                compare_section(&mut run, &identity, expected_section, actual_section, catalog, options)?
            }
            None => SectionOutcome {
                identity,
                status: SectionStatus::MissingInActual,
                layout: None,
                expected_rows: expected_section.rows.len(),
                actual_rows: 0,
                deviations: 0,
            },
        };
        run.push_section(outcome);
    }
    for (identity, actual_section) in actual.iter() {
        if !expected.contains(&identity) {
            run.push_section(SectionOutcome {
                identity,
                status: SectionStatus::MissingInExpected,
                layout: None,
                expected_rows: 0,
                actual_rows: actual_section.rows.len(),
                deviations: 0,
            });
        }
    }

    let result = run.finish();
    info!(
        passed = result.verdict(),
        deviations = result.deviation_count(),
        duration_ms = start.elapsed().as_millis(),
        "comparison complete"
    );
    Ok(result)
}

fn compare_record_totals(run: &mut ComparisonRun, expected: &Report, actual: &Report) {
    let (expected_total, actual_total) = (expected.total_rows(), actual.total_rows());
    let mut group = MessageGroup::new();
    group.note(format!(
        "Overall record count | Expected: [{expected_total}] | Actual: [{actual_total}]"
    ));
    if expected_total != actual_total {
        group.deviation(
            DeviationKind::RecordCountDeviation,
            format!(
                "Overall Expected Record count: [{expected_total}] | Actual Record count: [{actual_total}]"
            ),
        );
    }
    run.push_flag(expected_total == actual_total);
    run.push_group(group);
}

fn compare_section(
    run: &mut ComparisonRun,
    identity: &str,
    expected: &Section,
    actual: &Section,
    catalog: &LayoutCatalog,
    options: &CompareOptions,
) -> Result<SectionOutcome, CompareError> {
    let before = run.deviation_count();
    debug!(
        section = identity,
        expected_start = expected.start_line,
        actual_start = actual.start_line,
        "comparing section"
    );

    let mut banner = MessageGroup::new();
    banner.note("*".repeat(BANNER_WIDTH));
    banner.note("Data comparison started for section:");
    banner.note(format!("[{identity}]"));
    run.push_group(banner);

    let mut layout = None;
    let status = if compare_headers(run, &expected.header, &actual.header) {
        let key_fn = match options.strategy {
            MatchStrategy::Keyed => catalog.key_fn(&expected.header)?,
            MatchStrategy::Positional => None,
        };
        layout = key_fn.as_ref().map(|key_fn| key_fn.layout().name.clone());
        let rows = SectionRows {
            identity,
            header: &expected.header,
            expected: &expected.rows,
            actual: &actual.rows,
        };
        reconcile_rows(run, rows, key_fn.as_ref(), options);
        if run.deviation_count() > before {
            SectionStatus::Deviations
        } else {
            SectionStatus::Matched
        }
    } else {
        debug!(section = identity, "header mismatch; rows not compared");
        SectionStatus::HeaderMismatch
    };

    let mut closing = MessageGroup::new();
    closing.note("Data comparison Finished for section");
    closing.note("*".repeat(BANNER_WIDTH));
    run.push_group(closing);

    Ok(SectionOutcome {
        identity: identity.to_string(),
        status,
        layout,
        expected_rows: expected.rows.len(),
        actual_rows: actual.rows.len(),
        deviations: run.deviation_count() - before,
    })
}
