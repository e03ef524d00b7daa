//! Plain-text summary document.

use std::path::Path;

use rptcmp_model::{ComparisonResult, FAILURE_MESSAGE, SUCCESS_MESSAGE};

use crate::error::{ReportError, Result};

const RULE_WIDTH: usize = 100;

/// Renders the summary document for `result`.
///
/// Groups are written in order, separated by a blank line. The output
/// depends only on `result`.
pub fn render_summary(result: &ComparisonResult) -> String {
    let rule = "*".repeat(RULE_WIDTH);
    let status = if result.verdict() {
        SUCCESS_MESSAGE
    } else {
        FAILURE_MESSAGE
    };

    let mut out = String::new();
    for line in [
        rule.as_str(),
        "Report Comparison Summary",
        rule.as_str(),
        "Overall Comparison status:",
        status,
        rule.as_str(),
    ] {
        out.push_str(line);
        out.push('\n');
    }

    for (index, group) in result.groups.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        for line in &group.lines {
            out.push_str(&line.to_string());
            out.push('\n');
        }
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

/// Writes the summary document, replacing any existing file.
pub fn write_summary(path: &Path, result: &ComparisonResult) -> Result<()> {
    std::fs::write(path, render_summary(result)).map_err(|source| ReportError::SummaryWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        passed = result.verdict(),
        deviations = result.deviation_count(),
        "summary written"
    );
    Ok(())
}
