use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::TransformOutcome;

/// Print per-stage row counts to stderr, keeping stdout free for `--output -`.
pub fn print_summary(outcome: &TransformOutcome) {
    let report = &outcome.report;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Rows"),
        header_cell("Details"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let references = &report.references;
    let observations = &report.observations;
    let merged = &report.merged;
    table.add_row(vec![
        Cell::new("References"),
        Cell::new(references.rows_kept),
        detail_cell(
            references.duplicates_dropped,
            format!(
                "{} read, {} duplicates dropped",
                references.rows_read, references.duplicates_dropped
            ),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Observations"),
        Cell::new(observations.rows_kept),
        detail_cell(
            observations.invalid_values_dropped,
            format!(
                "{} read, {} cells filled, {} invalid values dropped, {} unparsed dates",
                observations.rows_read,
                observations.cells_filled,
                observations.invalid_values_dropped,
                observations.unparsed_dates
            ),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Joined"),
        Cell::new(merged.joined_rows),
        detail_cell(
            report.unmatched_observations(),
            format!("{} without reference", report.unmatched_observations()),
        ),
    ]);
    table.add_row(vec![
        Cell::new("In range"),
        Cell::new(merged.rows_in_range),
        dim_cell(format!("{} to {}", report.start, report.end)),
    ]);
    table.add_row(vec![
        Cell::new("Output")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.output_rows()).add_attribute(Attribute::Bold),
        dim_cell(format!(
            "lag {} over {} entities, {} differences",
            report.lag, merged.entity_groups, merged.differences
        )),
    ]);

    eprintln!("{table}");
    eprintln!("Output: {}", outcome.output);
    if let Some(path) = &outcome.report_path {
        eprintln!("Report: {}", path.display());
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Highlight details that report dropped rows.
fn detail_cell(dropped: usize, text: String) -> Cell {
    if dropped > 0 {
        Cell::new(text).fg(Color::Yellow)
    } else {
        dim_cell(text)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
