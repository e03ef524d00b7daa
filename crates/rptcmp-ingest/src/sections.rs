//! Section splitting.
//!
//! Line numbers are logical record numbers: every CSV record counts as one
//! line, including blank separator lines, while a quoted field spanning
//! several physical lines still counts once.

use csv::{ReaderBuilder, StringRecord};
use rptcmp_model::{Header, ParseOptions, Report, Row};

use crate::error::{IngestError, Result};

/// Parses CSV text into an ordered set of sections.
///
/// The `csv` reader skips blank lines, so section boundaries come from gaps
/// between the physical lines of consecutive records. `origin` names the
/// source in error messages.
pub fn parse_report(text: &str, options: &ParseOptions, origin: &str) -> Result<Report> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let lines = LineIndex::new(text);

    let mut report = Report::new();
    let mut current: Option<String> = None;
    let mut records_read = 0usize;
    let mut line_no = 0usize;
    let mut last_physical = 0usize;
    let mut record = StringRecord::new();

    loop {
        let start = reader.position().byte() as usize;
        let more = reader
            .read_record(&mut record)
            .map_err(|source| IngestError::CsvParse {
                origin: origin.to_string(),
                line: line_no + 1,
                source,
            })?;
        if !more {
            break;
        }
        let end = reader.position().byte() as usize;
        let Some((first, last)) = lines.span(start, end) else {
            current = None;
            continue;
        };

        let blanks = first.saturating_sub(last_physical + 1);
        if blanks > 0 {
            current = None;
        }
        line_no += blanks + 1;
        last_physical = last;
        records_read += 1;

        let fields = record.iter().map(str::to_string).collect();
        accept_record(&mut report, &mut current, line_no, fields, options);
    }

    report.set_records_read(records_read);
    Ok(report)
}

/// Maps byte offsets of the source text to 1-based physical lines.
struct LineIndex<'a> {
    text: &'a str,
    newlines: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let newlines = text
            .bytes()
            .enumerate()
            .filter(|(_, byte)| *byte == b'\n')
            .map(|(offset, _)| offset)
            .collect();
        Self { text, newlines }
    }

    fn line_at(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&newline| newline < offset) + 1
    }

    /// First and last physical line of the record read from `start..end`,
    /// ignoring line terminators around it. `None` for an empty record.
    fn span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let consumed = self.text.get(start..end)?;
        let is_terminator = |c: char| c == '\r' || c == '\n';
        let content = consumed.trim_matches(is_terminator);
        if content.is_empty() {
            return None;
        }
        let first = start + (consumed.len() - consumed.trim_start_matches(is_terminator).len());
        let last = first + content.len() - 1;
        Some((self.line_at(first), self.line_at(last)))
    }
}

fn accept_record(
    report: &mut Report,
    current: &mut Option<String>,
    line_no: usize,
    fields: Vec<String>,
    options: &ParseOptions,
) {
    if is_skippable(&fields, options) {
        tracing::trace!(line = line_no, "skipping subtotal row");
        return;
    }

    let Some(identity) = current.as_deref() else {
        let header = Header::new(fields);
        let identity = header.identity();
        let reopened = report.contains(&identity);
        report.open_section(line_no, header);
        tracing::debug!(line = line_no, section = %identity, reopened, "section header");
        *current = Some(identity);
        return;
    };

    if !is_data_row(line_no, &fields, options) {
        tracing::trace!(line = line_no, "skipping metadata row");
        return;
    }
    if let Some(section) = report.section_mut(identity) {
        let row = Row::from_fields(line_no, section.header.len(), fields);
        section.rows.push(row);
    }
}

fn is_skippable(fields: &[String], options: &ParseOptions) -> bool {
    let Some(first) = fields.first() else {
        return false;
    };
    options
        .skip_first_fields
        .iter()
        .any(|skip| skip.trim() == first.trim())
}

fn is_data_row(line_no: usize, fields: &[String], options: &ParseOptions) -> bool {
    if line_no <= options.metadata_lines {
        return false;
    }
    !fields.iter().any(|field| {
        options
            .placeholder_phrases
            .iter()
            .any(|phrase| field.contains(phrase.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Report {
        parse_report(text, &ParseOptions::default(), "test").unwrap()
    }

    #[test]
    fn test_blank_lines_split_sections() {
        let report = parse("T1,T2\nmeta,1\n\nA,B\n1,2\n3,4\n\nC\nx\n");
        assert_eq!(report.len(), 3);
        let ab = report.get("A|B").unwrap();
        assert_eq!(ab.start_line, 4);
        assert_eq!(ab.rows.len(), 2);
        assert_eq!(ab.rows[0].line, 5);
        assert_eq!(ab.rows[1].line, 6);
        let c = report.get("C").unwrap();
        assert_eq!(c.start_line, 8);
        assert_eq!(c.rows[0].line, 9);
    }

    #[test]
    fn test_header_is_not_data() {
        let report = parse("\n\n\n\nA,B\n1,2\n");
        let section = report.get("A|B").unwrap();
        assert_eq!(section.start_line, 5);
        assert_eq!(section.rows.len(), 1);
        assert_eq!(section.rows[0].values[0].as_deref(), Some("1"));
    }

    #[test]
    fn test_leading_lines_are_metadata() {
        let report = parse("Scan Results\nJan 01 2024\nTitle\nextra\n");
        let section = report.get("Scan Results").unwrap();
        assert_eq!(section.start_line, 1);
        // records 2 and 3 are metadata; record 4 is data
        assert_eq!(section.rows.len(), 1);
        assert_eq!(section.rows[0].line, 4);
    }

    #[test]
    fn test_skip_list_rows_ignored() {
        let report =
            parse("\n\n\n\nby Status\nStatus,Confirmed,Potential,Total\nNew,1,2,3\nby Severity\n");
        assert_eq!(report.len(), 1);
        let section = report.get("Status|Confirmed|Potential|Total").unwrap();
        assert_eq!(section.start_line, 6);
        assert_eq!(section.rows.len(), 1);
        assert_eq!(report.records_read(), 4);
    }

    #[test]
    fn test_placeholder_rows_ignored() {
        let report = parse(
            "\n\n\n\nIP,Note\n10.0.0.1,No results available for these hosts\n10.0.0.2,ok\n",
        );
        let section = report.get("IP|Note").unwrap();
        assert_eq!(section.rows.len(), 1);
        assert_eq!(section.rows[0].line, 7);
    }

    #[test]
    fn test_quoted_newline_counts_once() {
        let report = parse("\n\n\n\nA,B\n\"multi\nline\",1\n2,3\n\nC\nz\n");
        let ab = report.get("A|B").unwrap();
        assert_eq!(ab.rows.len(), 2);
        assert_eq!(ab.rows[0].line, 6);
        assert_eq!(ab.rows[1].line, 7);
        let c = report.get("C").unwrap();
        assert_eq!(c.start_line, 9);
    }

    #[test]
    fn test_literal_quote_in_unquoted_field() {
        let report =
            parse("\n\n\n\nIP,Note\n10.0.0.1,12\" monitor\n10.0.0.2,x\n10.0.0.3,y\n\nC\nz\n");
        assert_eq!(report.len(), 2);
        let section = report.get("IP|Note").unwrap();
        assert_eq!(section.rows.len(), 3);
        assert_eq!(section.rows[0].values[1].as_deref(), Some("12\" monitor"));
        assert_eq!(section.rows[2].line, 8);
        let c = report.get("C").unwrap();
        assert_eq!(c.start_line, 10);
        assert_eq!(c.rows[0].line, 11);
    }

    #[test]
    fn test_crlf_line_endings() {
        let report = parse("\r\n\r\n\r\n\r\nA,B\r\n1,2\r\n\r\nC\r\nz\r\n");
        let ab = report.get("A|B").unwrap();
        assert_eq!(ab.start_line, 5);
        assert_eq!(ab.rows[0].line, 6);
        let c = report.get("C").unwrap();
        assert_eq!(c.start_line, 8);
        assert_eq!(c.rows[0].line, 9);
    }

    #[test]
    fn test_ragged_rows() {
        let report = parse("\n\n\n\nA,B,C\n1\n1,2,3,4\n");
        let section = report.get("A|B|C").unwrap();
        assert_eq!(section.rows[0].values, vec![Some("1".to_string()), None, None]);
        assert_eq!(section.rows[1].overflow, vec!["4"]);
    }

    #[test]
    fn test_repeated_header_accumulates() {
        let report = parse("\n\n\n\nA,B\n1,2\n\nC\nx\n\nA,B\n3,4\n");
        assert_eq!(report.len(), 2);
        let section = report.get("A|B").unwrap();
        assert_eq!(section.start_line, 5);
        assert_eq!(section.rows.len(), 2);
        assert_eq!(section.rows[1].line, 12);
        let identities: Vec<String> = report.iter().map(|(id, _)| id).collect();
        assert_eq!(identities, vec!["A|B", "C"]);
    }

    #[test]
    fn test_empty_input() {
        let report = parse("");
        assert!(report.is_empty());
        assert_eq!(report.records_read(), 0);
    }

    #[test]
    fn test_whitespace_line_is_not_blank() {
        let report = parse("\n\n\n\nA\n1\n  \n2\n");
        let section = report.get("A").unwrap();
        assert_eq!(section.rows.len(), 3);
    }
}
