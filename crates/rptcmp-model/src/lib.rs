pub mod deviation;
pub mod error;
pub mod options;
pub mod report;
pub mod result;

pub use deviation::{Deviation, DeviationKind, MessageGroup, SummaryLine, contains_marker};
pub use error::{ConfigError, Result};
pub use options::{CompareOptions, ComparisonOptions, MatchStrategy, ParseOptions};
pub use report::{Header, Report, Row, Section};
pub use result::{ComparisonResult, SectionOutcome, SectionStatus};

/// Literal written to the summary when every check passed.
pub const SUCCESS_MESSAGE: &str = "No deviations found in report data";

/// Literal written to the summary when at least one deviation was recorded.
pub const FAILURE_MESSAGE: &str = "Deviations observed in report data";
