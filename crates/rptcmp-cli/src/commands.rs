use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::debug;

use rptcmp_model::{ComparisonOptions, MatchStrategy};
use rptcmp_report::{SearchOutcome, search_summary};
use rptcmp_cli::logging::redact_value;
use rptcmp_cli::pipeline::{ReportKind, Validation, validate_report_with};

use crate::cli::{CompareArgs, ReportKindArg, SearchArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_compare(args: &CompareArgs) -> Result<Validation> {
    let options = comparison_options(args)?;
    let kind = match args.kind {
        ReportKindArg::VmCsv => ReportKind::VulnerabilityCsv,
    };
    let validation = validate_report_with(kind, &args.expected, &args.actual, &args.summary, &options);
    if let Some(first) = validation.result.deviations().next() {
        debug!(deviation = redact_value(&first.to_string()), "first deviation");
    }
    Ok(validation)
}

/// Options from `--config` (or defaults), overridden by explicit flags.
pub fn comparison_options(args: &CompareArgs) -> Result<ComparisonOptions> {
    let mut options = match &args.config {
        Some(path) => ComparisonOptions::from_toml_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => ComparisonOptions::default(),
    };
    if args.positional {
        options.compare.strategy = MatchStrategy::Positional;
    }
    for column in &args.ignore_columns {
        if !options.compare.is_ignored(column) {
            options.compare.ignore_columns.push(column.clone());
        }
    }
    if args.skip_title_section {
        options.compare.skip_title_section = true;
    }
    Ok(options)
}

pub fn run_search(args: &SearchArgs) -> Result<SearchOutcome> {
    search_summary(&args.summary, &args.term)
        .with_context(|| format!("search summary {}", args.summary.display()))
}

pub fn run_layouts() -> Result<()> {
    let catalog = ReportKind::VulnerabilityCsv
        .catalog()
        .context("build layout catalog")?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Layout"),
        header_cell("Required columns"),
        header_cell("Key columns"),
    ]);
    apply_table_style(&mut table);
    for layout in catalog.layouts() {
        table.add_row(vec![
            layout.name.clone(),
            layout.required.join(", "),
            layout.key.join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> CompareArgs {
        CompareArgs {
            expected: PathBuf::from("exp.csv"),
            actual: PathBuf::from("act.csv"),
            summary: PathBuf::from("summary.txt"),
            kind: ReportKindArg::VmCsv,
            config: None,
            positional: false,
            ignore_columns: Vec::new(),
            skip_title_section: false,
            json: false,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("rptcmp.toml");
        std::fs::write(
            &config,
            "[compare]\nignore_columns = [\"Scan Date\"]\n\n[parse]\nmetadata_lines = 5\n",
        )
        .unwrap();

        let mut args = args();
        args.config = Some(config);
        args.positional = true;
        args.ignore_columns = vec!["Scan Date".to_string(), "Duration".to_string()];
        let options = comparison_options(&args).unwrap();

        assert_eq!(options.parse.metadata_lines, 5);
        assert_eq!(options.compare.strategy, MatchStrategy::Positional);
        assert_eq!(options.compare.ignore_columns, vec!["Scan Date", "Duration"]);
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let mut args = args();
        args.config = Some(PathBuf::from("/nonexistent/rptcmp.toml"));
        let err = comparison_options(&args).unwrap_err();
        assert!(format!("{err:#}").contains("load config"));
    }

    #[test]
    fn test_defaults_without_config() {
        let options = comparison_options(&args()).unwrap();
        assert_eq!(options, ComparisonOptions::default());
    }
}
