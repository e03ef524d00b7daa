//! Comparison of two parsed multi-section reports.
//!
//! The engine runs the checks in a fixed order and records every finding on a
//! run-scoped [`ComparisonRun`]:
//!
//! 1. overall record count
//! 2. section existence in both directions
//! 3. per shared section: column headers, then rows (keyed by the
//!    [`LayoutCatalog`] or paired by position)
//!
//! ```ignore
//! use rptcmp_compare::{LayoutCatalog, compare_reports};
//! use rptcmp_model::CompareOptions;
//!
//! let catalog = LayoutCatalog::builtin()?;
//! let result = compare_reports(&expected, &actual, &catalog, &CompareOptions::default())?;
//! println!("passed: {}", result.verdict());
//! ```

pub mod aggregate;
pub mod catalog;
pub mod engine;
mod error;
pub mod reconcile;
pub mod sections;

pub use aggregate::ComparisonRun;
pub use catalog::{KeyFn, Layout, LayoutCatalog, builtin_layouts};
pub use engine::compare_reports;
pub use error::{CatalogError, CompareError, Result};
pub use reconcile::{SectionRows, normalize, reconcile_rows};
pub use sections::{compare_headers, compare_section_sets};
