//! Report validation pipeline with explicit stages.
//!
//! 1. **Check inputs**: both report files must exist
//! 2. **Ingest**: read and split both reports into sections
//! 3. **Compare**: run the comparison engine with the layout catalog of the
//!    report kind
//! 4. **Write**: render the summary document, then read the verdict back
//!
//! Ordinary differences never surface as errors. Failures in stages 2 and 3
//! become a `Comparison_Error` line in the summary and a failed verdict.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, info_span, warn};

use rptcmp_compare::{CatalogError, LayoutCatalog, compare_reports};
use rptcmp_ingest::read_report;
use rptcmp_model::{ComparisonOptions, ComparisonResult};
use rptcmp_report::{summary_passed, write_summary};

/// Supported report families.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportKind {
    /// Vulnerability-management scan CSV exports.
    #[default]
    VulnerabilityCsv,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VulnerabilityCsv => "vm-csv",
        }
    }

    /// Layout catalog used to key rows of this kind of report.
    pub fn catalog(&self) -> std::result::Result<LayoutCatalog, CatalogError> {
        match self {
            Self::VulnerabilityCsv => LayoutCatalog::builtin(),
        }
    }
}

/// A finished validation: the recorded result and the verdict read back from
/// the written summary.
#[derive(Debug)]
pub struct Validation {
    pub result: ComparisonResult,
    pub passed: bool,
}

/// Compares two report files and writes the summary; returns the verdict.
///
/// Never fails: errors are logged and reported as a failed comparison.
pub fn validate_report(kind: ReportKind, expected: &Path, actual: &Path, summary: &Path) -> bool {
    validate_report_with(kind, expected, actual, summary, &ComparisonOptions::default()).passed
}

/// [`validate_report`] with explicit options, keeping the full result.
pub fn validate_report_with(
    kind: ReportKind,
    expected: &Path,
    actual: &Path,
    summary: &Path,
    options: &ComparisonOptions,
) -> Validation {
    let result = match run_comparison(kind, expected, actual, options) {
        Ok(result) => result,
        Err(err) => {
            let chain = format!("{err:#}");
            error!(error = %chain, "comparison failed");
            ComparisonResult::failed(chain)
        }
    };

    let passed = write_summary(summary, &result)
        .and_then(|()| summary_passed(summary))
        .unwrap_or_else(|err| {
            error!(error = %err, summary = %summary.display(), "summary unavailable");
            false
        });
    Validation { result, passed }
}

/// Stages 1-3: existence check, ingest and comparison.
pub fn run_comparison(
    kind: ReportKind,
    expected: &Path,
    actual: &Path,
    options: &ComparisonOptions,
) -> Result<ComparisonResult> {
    let span = info_span!(
        "validate_report",
        kind = kind.as_str(),
        expected = %expected.display(),
        actual = %actual.display()
    );
    let _guard = span.enter();

    if !expected.exists() || !actual.exists() {
        warn!(
            expected_present = expected.exists(),
            actual_present = actual.exists(),
            "report file missing"
        );
        return Ok(ComparisonResult::files_not_present());
    }

    let catalog = kind.catalog().context("build layout catalog")?;

    let ingest_start = Instant::now();
    let expected_report = read_report(expected, &options.parse)
        .with_context(|| format!("read expected report {}", expected.display()))?;
    let actual_report = read_report(actual, &options.parse)
        .with_context(|| format!("read actual report {}", actual.display()))?;
    info!(
        expected_sections = expected_report.len(),
        actual_sections = actual_report.len(),
        expected_rows = expected_report.total_rows(),
        actual_rows = actual_report.total_rows(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    compare_reports(&expected_report, &actual_report, &catalog, &options.compare)
        .context("compare reports")
}
