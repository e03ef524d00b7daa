//! Summary document output and queries.
//!
//! The summary is a plain-text file: a status banner followed by the message
//! groups of a [`ComparisonResult`](rptcmp_model::ComparisonResult). Deviation
//! lines start with a bracketed marker such as
//! `[Column_Data_Deviation_Security_Risk]`, which [`search_summary`] can look
//! for afterwards.

mod error;
pub mod query;
pub mod summary;

pub use error::{ReportError, Result};
pub use query::{SearchOutcome, is_deviation_present, search_summary, search_text, summary_passed};
pub use summary::{render_summary, write_summary};
