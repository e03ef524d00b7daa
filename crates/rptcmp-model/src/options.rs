//! Configuration options for report parsing and comparison.
//!
//! Options can be built in code or loaded from a TOML file. Every field has a
//! default, so a file only needs the keys it overrides:
//!
//! ```toml
//! [parse]
//! metadata_lines = 5
//!
//! [compare]
//! strategy = "positional"
//! ignore_columns = ["Date Range", "Scan Date"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// How rows of a matched section are paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Pair rows by their derived composite key, independent of order.
    #[default]
    Keyed,
    /// Pair the i-th expected row with the i-th actual row.
    Positional,
}

/// Options for splitting a CSV report into sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Records whose first field is one of these are dropped entirely.
    pub skip_first_fields: Vec<String>,
    /// Records containing any of these phrases in any field are not data.
    pub placeholder_phrases: Vec<String>,
    /// Records numbered at or below this are report metadata, never data.
    pub metadata_lines: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            skip_first_fields: vec!["by Status".to_string(), "by Severity".to_string()],
            placeholder_phrases: vec![
                "No vulnerabilities match your filters for these hosts".to_string(),
                "No results available for these hosts".to_string(),
            ],
            metadata_lines: 3,
        }
    }
}

/// Options controlling section and row comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    pub strategy: MatchStrategy,
    /// Columns excluded from value comparison (free-text, run-dependent).
    pub ignore_columns: Vec<String>,
    /// Exempt the first expected section (the report title block) from the
    /// section-existence check.
    pub skip_title_section: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Keyed,
            ignore_columns: vec!["Date Range".to_string()],
            skip_title_section: false,
        }
    }
}

impl CompareOptions {
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_ignore_column(mut self, column: impl Into<String>) -> Self {
        self.ignore_columns.push(column.into());
        self
    }

    pub fn with_skip_title_section(mut self, enable: bool) -> Self {
        self.skip_title_section = enable;
        self
    }

    pub fn is_ignored(&self, column: &str) -> bool {
        let column = column.trim();
        self.ignore_columns
            .iter()
            .any(|ignored| ignored.trim() == column)
    }
}

/// Complete option set for one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonOptions {
    pub parse: ParseOptions,
    pub compare: CompareOptions,
}

impl ComparisonOptions {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_vulnerability_reports() {
        let options = ComparisonOptions::default();
        assert_eq!(options.parse.metadata_lines, 3);
        assert!(options.compare.is_ignored("Date Range"));
        assert!(!options.compare.is_ignored("IP"));
        assert_eq!(options.compare.strategy, MatchStrategy::Keyed);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let options = ComparisonOptions::from_toml_str(
            r#"
[compare]
strategy = "positional"
skip_title_section = true
"#,
        )
        .expect("parse toml");
        assert_eq!(options.compare.strategy, MatchStrategy::Positional);
        assert!(options.compare.skip_title_section);
        assert_eq!(options.compare.ignore_columns, vec!["Date Range"]);
        assert_eq!(options.parse, ParseOptions::default());
    }

    #[test]
    fn invalid_toml_is_reported() {
        let err = ComparisonOptions::from_toml_str("[compare]\nstrategy = \"sorted\"\n")
            .expect_err("unknown strategy");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = ComparisonOptions::from_toml_file(&dir.path().join("absent.toml"))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
