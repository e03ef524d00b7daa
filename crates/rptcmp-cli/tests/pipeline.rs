//! Integration tests for the validation pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use rptcmp_cli::pipeline::{ReportKind, validate_report, validate_report_with};
use rptcmp_model::{ComparisonOptions, DeviationKind, MatchStrategy};
use rptcmp_report::{SearchOutcome, is_deviation_present, search_summary};

const SCAN: &str = "\"Scan Results\",\"Jan 10 2024 10:00AM (GMT-0500)\"
\"Acme Corp\",\"100 Main St\",\"Springfield\"
\"Report Title\",\"Weekly Servers\"

\"IP\",\"Network\",\"Total Vulnerabilities\",\"Security Risk\"
\"10.0.0.1\",\"net-a\",\"3\",\"High\"
\"10.0.0.2\",\"net-a\",\"1\",\"Low\"

by Status
\"Status\",\"Confirmed\",\"Potential\",\"Total\"
\"New\",\"1\",\"2\",\"3\"
\"Active\",\"4\",\"5\",\"9\"

\"IP\",\"DNS\",\"NetBIOS\",\"OS\",\"IP Status\",\"QID\",\"Type\",\"Port\",\"Protocol\",\"FQDN\",\"Instance\",\"Results\"
\"10.0.0.1\",\"web01.example\",\"WEB01\",\"Linux\",\"host scanned\",\"38170\",\"Vuln\",\"443\",\"tcp\",\"\",\"\",\"Certificate expired
on Jan 01 2024\"
\"10.0.0.2\",\"db01.example\",\"DB01\",\"Linux\",\"host scanned\",\"\",\"\",\"\",\"\",\"\",\"\",\"No results available for these hosts\"
";

struct Workspace {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

fn summary_text(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn identical_reports_pass() {
    let ws = Workspace::new();
    let expected = ws.write("expected.csv", SCAN);
    let actual = ws.write("actual.csv", SCAN);
    let summary = ws.path("summary.txt");

    assert!(validate_report(ReportKind::VulnerabilityCsv, &expected, &actual, &summary));
    let text = summary_text(&summary);
    assert!(text.contains("No deviations found in report data"));
    assert!(text.contains("Number of sections in Expected report: 4"));
    assert!(text.contains("Overall record count | Expected: [5] | Actual: [5]"));
}

#[test]
fn changed_risk_is_searchable() {
    let ws = Workspace::new();
    let expected = ws.write("expected.csv", SCAN);
    let actual = ws.write("actual.csv", &SCAN.replace("\"3\",\"High\"", "\"3\",\"Critical\""));
    let summary = ws.path("summary.txt");

    assert!(!validate_report(ReportKind::VulnerabilityCsv, &expected, &actual, &summary));
    assert!(is_deviation_present(&summary, "Column_Data_Deviation_Security_Risk").unwrap());
    assert!(!is_deviation_present(&summary, "Column_Data_Deviation_OS").unwrap());
    match search_summary(&summary, "Security_Risk").unwrap() {
        SearchOutcome::Found { line } => {
            assert!(line.contains("Line in Expected report: 6 ; Line in Actual report: 6"));
            assert!(line.contains("Expected: [High] Actual: [Critical]"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn reordered_rows_pass() {
    let ws = Workspace::new();
    let reordered = SCAN.replace(
        "\"10.0.0.1\",\"net-a\",\"3\",\"High\"\n\"10.0.0.2\",\"net-a\",\"1\",\"Low\"",
        "\"10.0.0.2\",\"net-a\",\"1\",\"Low\"\n\"10.0.0.1\",\"net-a\",\"3\",\"High\"",
    );
    assert_ne!(reordered, SCAN);
    let expected = ws.write("expected.csv", SCAN);
    let actual = ws.write("actual.csv", &reordered);
    let summary = ws.path("summary.txt");
    assert!(validate_report(ReportKind::VulnerabilityCsv, &expected, &actual, &summary));
}

#[test]
fn missing_input_writes_files_not_present() {
    let ws = Workspace::new();
    let expected = ws.write("expected.csv", SCAN);
    let summary = ws.path("summary.txt");

    assert!(!validate_report(
        ReportKind::VulnerabilityCsv,
        &expected,
        &ws.path("absent.csv"),
        &summary
    ));
    let text = summary_text(&summary);
    assert!(text.contains(
        "[Report_files_not_present] Expected or Actual file is not present at given location"
    ));
    assert!(matches!(
        search_summary(&summary, "Security_Risk").unwrap(),
        SearchOutcome::Blocked { .. }
    ));
}

#[test]
fn missing_section_fails() {
    let ws = Workspace::new();
    let without_status = SCAN.replace(
        "by Status\n\"Status\",\"Confirmed\",\"Potential\",\"Total\"\n\"New\",\"1\",\"2\",\"3\"\n\"Active\",\"4\",\"5\",\"9\"\n\n",
        "",
    );
    let expected = ws.write("expected.csv", SCAN);
    let actual = ws.write("actual.csv", &without_status);
    let summary = ws.path("summary.txt");

    let validation = validate_report_with(
        ReportKind::VulnerabilityCsv,
        &expected,
        &actual,
        &summary,
        &ComparisonOptions::default(),
    );
    assert!(!validation.passed);
    assert!(summary_text(&summary).contains(
        "Following sections are present in Expected report and absent in Actual report:\n[1] Status|Confirmed|Potential|Total"
    ));
    assert!(
        validation
            .result
            .deviations()
            .any(|d| d.kind == DeviationKind::ReportSectionDeviation)
    );
}

#[test]
fn empty_reports_pass() {
    let ws = Workspace::new();
    let expected = ws.write("expected.csv", "");
    let actual = ws.write("actual.csv", "");
    let summary = ws.path("summary.txt");

    assert!(validate_report(ReportKind::VulnerabilityCsv, &expected, &actual, &summary));
    let text = summary_text(&summary);
    assert!(text.contains("Number of sections in Expected report: 0"));
    assert!(text.contains("Number of sections in Actual report: 0"));
}

#[test]
fn unreadable_report_is_a_comparison_error() {
    let ws = Workspace::new();
    let expected = ws.write("expected.csv", SCAN);
    let actual = ws.path("actual.csv");
    fs::write(&actual, [0xFF, 0xFE, b'A', 0x00]).unwrap();
    let summary = ws.path("summary.txt");

    assert!(!validate_report(ReportKind::VulnerabilityCsv, &expected, &actual, &summary));
    let text = summary_text(&summary);
    assert!(text.contains("[Comparison_Error] read actual report"));
    assert!(text.contains("UTF-16 LE"));
}

#[test]
fn unwritable_summary_fails() {
    let ws = Workspace::new();
    let expected = ws.write("expected.csv", SCAN);
    let actual = ws.write("actual.csv", SCAN);
    let summary = ws.path("missing-dir").join("summary.txt");
    assert!(!validate_report(ReportKind::VulnerabilityCsv, &expected, &actual, &summary));
}

#[test]
fn summary_is_rewritten_each_run() {
    let ws = Workspace::new();
    let expected = ws.write("expected.csv", SCAN);
    let changed = ws.write("changed.csv", &SCAN.replace("\"Low\"", "\"Medium\""));
    let summary = ws.path("summary.txt");

    assert!(!validate_report(ReportKind::VulnerabilityCsv, &expected, &changed, &summary));
    let failing = summary_text(&summary);
    assert!(validate_report(ReportKind::VulnerabilityCsv, &expected, &expected, &summary));
    let passing = summary_text(&summary);
    assert!(!passing.contains("Column_Data_Deviation"));
    assert_ne!(failing, passing);

    validate_report(ReportKind::VulnerabilityCsv, &expected, &expected, &summary);
    assert_eq!(summary_text(&summary), passing);
}

#[test]
fn options_change_the_verdict() {
    let ws = Workspace::new();
    let expected = ws.write("expected.csv", SCAN);
    let actual = ws.write("actual.csv", &SCAN.replace("\"High\"", "\"Critical\""));
    let summary = ws.path("summary.txt");

    let options = ComparisonOptions::from_toml_str(
        "[compare]\nignore_columns = [\"Date Range\", \"Security Risk\"]\n",
    )
    .unwrap();
    let validation = validate_report_with(
        ReportKind::VulnerabilityCsv,
        &expected,
        &actual,
        &summary,
        &options,
    );
    assert!(validation.passed);

    let mut positional = ComparisonOptions::default();
    positional.compare.strategy = MatchStrategy::Positional;
    let validation = validate_report_with(
        ReportKind::VulnerabilityCsv,
        &expected,
        &actual,
        &summary,
        &positional,
    );
    assert!(!validation.passed);
}
