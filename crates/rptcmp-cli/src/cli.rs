//! CLI argument definitions for the report comparison tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rptcmp",
    version,
    about = "Compare an actual multi-section CSV report against an expected one",
    long_about = "Compare an actual multi-section CSV report against an expected one.\n\n\
                  Sections are matched by header, rows by a layout-derived key, and every\n\
                  deviation is written to a plain-text summary that can be searched later."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow report cell values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two reports and write a comparison summary.
    Compare(CompareArgs),

    /// Search a written summary for a deviation marker or column name.
    Search(SearchArgs),

    /// List the built-in row key layouts.
    Layouts,
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Reference report.
    #[arg(value_name = "EXPECTED")]
    pub expected: PathBuf,

    /// Report under test.
    #[arg(value_name = "ACTUAL")]
    pub actual: PathBuf,

    /// Summary document to write (replaced if it exists).
    #[arg(long = "summary", value_name = "PATH", default_value = "comparison_summary.txt")]
    pub summary: PathBuf,

    /// Report family, which selects the row key layouts.
    #[arg(long = "kind", value_enum, default_value = "vm-csv")]
    pub kind: ReportKindArg,

    /// TOML file with parse and compare options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Pair rows by position instead of by key.
    #[arg(long = "positional")]
    pub positional: bool,

    /// Exclude a column from value comparison (repeatable).
    #[arg(long = "ignore-column", value_name = "COLUMN")]
    pub ignore_columns: Vec<String>,

    /// Exempt the expected report's first section from the existence check.
    #[arg(long = "skip-title-section")]
    pub skip_title_section: bool,

    /// Print the comparison result as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct SearchArgs {
    /// Summary document written by `compare`.
    #[arg(value_name = "SUMMARY")]
    pub summary: PathBuf,

    /// Text to look for, e.g. `Column_Data_Deviation_Security_Risk`.
    #[arg(value_name = "TERM")]
    pub term: String,
}

/// CLI report kind choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ReportKindArg {
    /// Vulnerability-management scan CSV.
    #[value(name = "vm-csv")]
    VmCsv,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
