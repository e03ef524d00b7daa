//! Layout catalog: which columns identify a row in a known section shape.
//!
//! A [`Layout`] matches a header when every required and key column is
//! present. The catalog is ordered; [`LayoutCatalog::new`] rejects layouts
//! that duplicate or are shadowed by an earlier entry, and lookups reject
//! headers that satisfy two unrelated layouts.

use std::collections::BTreeSet;

use rptcmp_model::{Header, Row};

use crate::error::{CatalogError, CompareError, Result};

/// A named section shape and the columns that key its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub name: String,
    pub required: Vec<String>,
    pub key: Vec<String>,
}

impl Layout {
    pub fn new(name: impl Into<String>, required: &[&str], key: &[&str]) -> Self {
        Self {
            name: name.into(),
            required: required.iter().map(|column| (*column).to_string()).collect(),
            key: key.iter().map(|column| (*column).to_string()).collect(),
        }
    }

    /// Trimmed names of every column a header must carry to match.
    fn match_set(&self) -> BTreeSet<&str> {
        self.required
            .iter()
            .chain(self.key.iter())
            .map(|column| column.trim())
            .collect()
    }

    pub fn matches(&self, header: &Header) -> bool {
        self.match_set().iter().all(|column| header.contains(column))
    }
}

/// Builds the row key for one section: key column values joined with `|`,
/// with all whitespace removed. Absent values contribute an empty string.
#[derive(Debug, Clone)]
pub struct KeyFn<'a> {
    layout: &'a Layout,
    positions: Vec<Option<usize>>,
}

impl<'a> KeyFn<'a> {
    fn resolve(layout: &'a Layout, header: &Header) -> Self {
        let positions = layout
            .key
            .iter()
            .map(|column| header.position(column))
            .collect();
        Self { layout, positions }
    }

    pub fn layout(&self) -> &'a Layout {
        self.layout
    }

    pub fn key(&self, row: &Row) -> String {
        let joined = self
            .positions
            .iter()
            .map(|position| position.and_then(|index| row.value(index)).unwrap_or(""))
            .collect::<Vec<_>>()
            .join("|");
        joined.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

/// Ordered, validated set of layouts.
#[derive(Debug, Clone)]
pub struct LayoutCatalog {
    layouts: Vec<Layout>,
}

impl LayoutCatalog {
    /// Validates and wraps `layouts`, keeping their order.
    pub fn new(layouts: Vec<Layout>) -> Result<Self> {
        for (index, layout) in layouts.iter().enumerate() {
            if layout.key.iter().all(|column| column.trim().is_empty()) {
                return Err(CatalogError::EmptyLayout {
                    name: layout.name.clone(),
                });
            }
            let set = layout.match_set();
            for earlier in &layouts[..index] {
                if earlier.name == layout.name {
                    return Err(CatalogError::DuplicateName {
                        name: layout.name.clone(),
                    });
                }
                let earlier_set = earlier.match_set();
                if earlier_set == set {
                    return Err(CatalogError::DuplicateLayout {
                        first: earlier.name.clone(),
                        second: layout.name.clone(),
                    });
                }
                if set.is_superset(&earlier_set) {
                    return Err(CatalogError::ShadowedLayout {
                        layout: layout.name.clone(),
                        shadowed_by: earlier.name.clone(),
                    });
                }
            }
        }
        Ok(Self { layouts })
    }

    /// The vulnerability-scan CSV layouts.
    pub fn builtin() -> Result<Self> {
        Self::new(builtin_layouts())
    }

    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    /// First layout matching `header` in catalog order.
    ///
    /// Every other matching layout must be refined by or refine the chosen
    /// one; a header satisfying two unrelated layouts is rejected.
    pub fn select(&self, header: &Header) -> std::result::Result<Option<&Layout>, CompareError> {
        let mut matched = self.layouts.iter().filter(|layout| layout.matches(header));
        let Some(first) = matched.next() else {
            return Ok(None);
        };
        let first_set = first.match_set();
        let unrelated: Vec<&Layout> = matched
            .filter(|other| {
                let other_set = other.match_set();
                !first_set.is_superset(&other_set) && !first_set.is_subset(&other_set)
            })
            .collect();
        if !unrelated.is_empty() {
            return Err(CompareError::AmbiguousLayout {
                section: header.identity(),
                layouts: std::iter::once(first)
                    .chain(unrelated)
                    .map(|layout| layout.name.clone())
                    .collect(),
            });
        }
        Ok(Some(first))
    }

    /// Key function for rows under `header`, or `None` when no layout applies.
    pub fn key_fn(&self, header: &Header) -> std::result::Result<Option<KeyFn<'_>>, CompareError> {
        Ok(self
            .select(header)?
            .map(|layout| KeyFn::resolve(layout, header)))
    }
}

/// Built-in layouts in selection order.
pub fn builtin_layouts() -> Vec<Layout> {
    vec![
        Layout::new(
            "host-summary",
            &["IP", "Network", "Total Vulnerabilities", "Security Risk"],
            &["IP", "Network"],
        ),
        Layout::new(
            "status-breakdown",
            &["Status", "Confirmed", "Potential", "Total"],
            &["Status"],
        ),
        Layout::new(
            "severity-breakdown",
            &[
                "Severity",
                "Confirmed",
                "Potential",
                "Information Gathered",
                "Total",
            ],
            &["Severity"],
        ),
        Layout::new(
            "host-inventory",
            &["IP", "DNS", "NetBIOS", "OS", "IP Status"],
            &[
                "IP", "DNS", "NetBIOS", "QID", "Type", "Port", "Protocol", "FQDN", "Instance",
            ],
        ),
        Layout::new(
            "asset-group-summary",
            &["Asset Groups", "IPs", "Active Hosts"],
            &["Asset Groups", "IPs", "Active Hosts"],
        ),
        Layout::new(
            "vulnerability-count",
            &["Total Vulnerabilities"],
            &["Total Vulnerabilities"],
        ),
        Layout::new(
            "scan-metadata",
            &[
                "Launch Date",
                "Active Hosts",
                "Total Hosts",
                "Type",
                "Status",
                "Reference",
                "Scanner Appliance",
                "Duration",
                "Scan Title",
            ],
            &["Launch Date"],
        ),
    ]
}
