//! Report ingestion.
//!
//! Splits a multi-section CSV report into a [`Report`](rptcmp_model::Report):
//! blank lines separate sections, the first record of each section is its
//! header, and noise rows (subtotals, "no data" placeholders, leading report
//! metadata) are dropped.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rptcmp_ingest::read_report;
//! use rptcmp_model::ParseOptions;
//!
//! let report = read_report(Path::new("scan_expected.csv"), &ParseOptions::default())?;
//! for (identity, section) in report.iter() {
//!     println!("{identity}: {} rows", section.rows.len());
//! }
//! ```

mod error;
mod reader;
mod sections;

pub use error::{IngestError, Result};
pub use reader::{read_report, validate_encoding};
pub use sections::parse_report;
