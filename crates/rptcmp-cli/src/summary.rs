use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use rptcmp_cli::pipeline::Validation;
use rptcmp_model::{SectionOutcome, SectionStatus};

pub fn print_comparison(validation: &Validation, summary: &Path) {
    let result = &validation.result;
    println!("Summary: {}", summary.display());
    println!(
        "Sections: expected {} / actual {}",
        result.expected_sections, result.actual_sections
    );
    println!(
        "Records: expected {} / actual {}",
        result.expected_records, result.actual_records
    );

    if !result.sections.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Section"),
            header_cell("Layout"),
            header_cell("Expected"),
            header_cell("Actual"),
            header_cell("Status"),
            header_cell("Deviations"),
        ]);
        apply_summary_table_style(&mut table);
        align_column(&mut table, 2, CellAlignment::Right);
        align_column(&mut table, 3, CellAlignment::Right);
        align_column(&mut table, 4, CellAlignment::Center);
        align_column(&mut table, 5, CellAlignment::Right);
        for section in &result.sections {
            table.add_row(section_row(section));
        }
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            Cell::new(result.expected_records).add_attribute(Attribute::Bold),
            Cell::new(result.actual_records).add_attribute(Attribute::Bold),
            dim_cell("-"),
            count_cell(result.deviation_count()).add_attribute(Attribute::Bold),
        ]);
        println!("{table}");
    }

    if validation.passed {
        println!("{}", rptcmp_model::SUCCESS_MESSAGE);
    } else {
        eprintln!("{}", rptcmp_model::FAILURE_MESSAGE);
        if let Some(first) = result.deviations().next() {
            let line = first.to_string();
            eprintln!("First deviation: {}", line.lines().next().unwrap_or_default());
        }
    }
}

fn section_row(section: &SectionOutcome) -> Vec<Cell> {
    vec![
        Cell::new(&section.identity),
        match &section.layout {
            Some(layout) => Cell::new(layout),
            None => dim_cell("-"),
        },
        Cell::new(section.expected_rows),
        Cell::new(section.actual_rows),
        status_cell(section.status),
        count_cell(section.deviations),
    ]
}

fn status_cell(status: SectionStatus) -> Cell {
    let cell = Cell::new(status.as_str());
    match status {
        SectionStatus::Matched => cell.fg(Color::Green),
        SectionStatus::Deviations => cell.fg(Color::Yellow),
        SectionStatus::HeaderMismatch
        | SectionStatus::MissingInActual
        | SectionStatus::MissingInExpected => cell.fg(Color::Red).add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
            ColumnConstraint::UpperBoundary(Width::Fixed(22)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(12)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
