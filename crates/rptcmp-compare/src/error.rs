//! Error types for layout catalogs and comparison runs.

use thiserror::Error;

/// Catalog configuration errors, raised when a catalog is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A layout without key columns cannot derive row keys.
    #[error("layout '{name}' has no key columns")]
    EmptyLayout { name: String },

    #[error("layout name '{name}' is used more than once")]
    DuplicateName { name: String },

    /// Two layouts would match exactly the same headers.
    #[error("layouts '{first}' and '{second}' match exactly the same headers")]
    DuplicateLayout { first: String, second: String },

    /// A later layout requires a strict superset of an earlier one's columns.
    #[error(
        "layout '{layout}' can never be selected: '{shadowed_by}' precedes it and matches every header it matches"
    )]
    ShadowedLayout { layout: String, shadowed_by: String },
}

/// Errors that abort a comparison run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    /// A section header satisfies layouts neither of which refines the other.
    #[error("section [{section}] matches unrelated layouts: {}", layouts.join(", "))]
    AmbiguousLayout {
        section: String,
        layouts: Vec<String>,
    },
}

/// Result type for catalog construction.
pub type Result<T> = std::result::Result<T, CatalogError>;
