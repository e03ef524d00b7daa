//! Parsed report structure: sections, headers and rows.
//!
//! A [`Report`] is built once by the section parser and read-only afterwards.
//! Sections are kept in first-seen order and indexed by their identity, the
//! pipe-joined trimmed header.

use std::collections::BTreeMap;

/// Column header of a report section.
///
/// Column names are kept exactly as read. Duplicate and blank names are
/// allowed; lookups by name resolve to the first matching position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Pipe-joined trimmed column names, used to match sections across reports.
    pub fn identity(&self) -> String {
        self.columns
            .iter()
            .map(|column| column.trim())
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the first column whose trimmed name equals `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.columns.iter().position(|column| column.trim() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

/// One data record of a section.
///
/// `values` is aligned with the section header. A value is `None` when the
/// record had fewer fields than the header; fields beyond the header are kept
/// in `overflow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Logical record number in the source file (1-based).
    pub line: usize,
    pub values: Vec<Option<String>>,
    pub overflow: Vec<String>,
}

impl Row {
    /// Overlays `fields` on a header of `width` columns.
    pub fn from_fields(line: usize, width: usize, fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        let values: Vec<Option<String>> = (0..width).map(|_| fields.next()).collect();
        Self {
            line,
            values,
            overflow: fields.collect(),
        }
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|value| value.as_deref())
    }

    /// Value of the named column, resolved through `header`.
    pub fn get(&self, header: &Header, column: &str) -> Option<&str> {
        header.position(column).and_then(|index| self.value(index))
    }

    /// Column/value pairs in header order.
    pub fn iter<'a>(
        &'a self,
        header: &'a Header,
    ) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + 'a {
        header
            .columns()
            .iter()
            .enumerate()
            .map(|(index, column)| (column.as_str(), self.value(index)))
    }

    /// Positional fields: header-aligned values (missing as empty) then overflow.
    pub fn to_fields(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|value| value.clone().unwrap_or_default())
            .chain(self.overflow.iter().cloned())
            .collect()
    }

    /// Short human-readable rendering used in deviation listings.
    pub fn describe(&self, header: &Header) -> String {
        let mut parts: Vec<String> = self
            .iter(header)
            .map(|(column, value)| format!("{}: {}", column.trim(), value.unwrap_or("")))
            .collect();
        if !self.overflow.is_empty() {
            parts.push(format!("Overflow: {}", self.overflow.join(", ")));
        }
        format!("Line {} | {}", self.line, parts.join(" | "))
    }
}

/// A contiguous block of a report sharing one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Logical record number of the header line (1-based).
    pub start_line: usize,
    pub header: Header,
    pub rows: Vec<Row>,
}

impl Section {
    pub fn new(start_line: usize, header: Header) -> Self {
        Self {
            start_line,
            header,
            rows: Vec::new(),
        }
    }

    pub fn identity(&self) -> String {
        self.header.identity()
    }
}

/// Ordered mapping from section identity to section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    sections: Vec<Section>,
    index: BTreeMap<String, usize>,
    records_read: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the section for `header`, reusing an existing section with the
    /// same identity. Returns the section so rows can be appended.
    pub fn open_section(&mut self, start_line: usize, header: Header) -> &mut Section {
        let identity = header.identity();
        let position = match self.index.get(&identity) {
            Some(&position) => position,
            None => {
                self.sections.push(Section::new(start_line, header));
                let position = self.sections.len() - 1;
                self.index.insert(identity, position);
                position
            }
        };
        &mut self.sections[position]
    }

    pub fn section_mut(&mut self, identity: &str) -> Option<&mut Section> {
        let position = *self.index.get(identity)?;
        self.sections.get_mut(position)
    }

    pub fn set_records_read(&mut self, records_read: usize) {
        self.records_read = records_read;
    }

    /// Non-blank CSV records seen while parsing.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    pub fn get(&self, identity: &str) -> Option<&Section> {
        self.index
            .get(identity)
            .and_then(|&position| self.sections.get(position))
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.index.contains_key(identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, &Section)> {
        self.sections
            .iter()
            .map(|section| (section.identity(), section))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Data rows across all sections.
    pub fn total_rows(&self) -> usize {
        self.sections.iter().map(|section| section.rows.len()).sum()
    }
}
