//! Terminal rendering of results and profiles.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use finrecon::workflow::{MatchSeverity, ProfileSummary, ResultsView};

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn severity_color(severity: MatchSeverity) -> Color {
    match severity {
        MatchSeverity::Good => Color::Green,
        MatchSeverity::Warning => Color::Yellow,
        MatchSeverity::Poor => Color::Red,
    }
}

pub fn print_columns(name: &str, columns: &[String]) {
    println!("Columns in {name}:");
    for (index, column) in columns.iter().enumerate() {
        println!("  {:>3}. {column}", index + 1);
    }
}

pub fn print_stats(view: &ResultsView<'_>) {
    let mut table = new_table();
    table.set_header(vec![
        header_cell("Total records"),
        header_cell("Matched"),
        header_cell("Unmatched"),
        header_cell("Match %"),
    ]);
    table.add_row(vec![
        Cell::new(view.total_records()),
        Cell::new(view.matched_records()),
        Cell::new(view.unmatched_records()),
        Cell::new(format!("{:.2}%", view.match_percentage()))
            .fg(severity_color(view.severity()))
            .add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

/// Print at most `limit` of the filtered rows.
pub fn print_rows(view: &ResultsView<'_>, limit: usize) {
    let rows = view.rows();
    println!("{}", view.preview_label());
    if rows.is_empty() {
        println!("No rows to show.");
        return;
    }

    let mut table = new_table();
    table.set_header(view.columns().iter().map(|c| header_cell(c)).collect::<Vec<_>>());
    for row in rows.iter().take(limit) {
        let cells = view.formatted_row(row).into_iter().map(Cell::new);
        if row.is_difference() {
            table.add_row(cells.map(|cell| cell.fg(Color::Red)).collect::<Vec<_>>());
        } else {
            table.add_row(cells.collect::<Vec<_>>());
        }
    }
    println!("{table}");
    if rows.len() > limit {
        println!("... {} more rows not shown", rows.len() - limit);
    }
}

pub fn print_profiles(count_label: &str, summaries: &[ProfileSummary], details: bool) {
    if summaries.is_empty() {
        println!("No configuration profiles saved yet.");
        return;
    }
    println!("{count_label}");

    if !details {
        for summary in summaries {
            println!("  {}", summary.name);
        }
        return;
    }

    let mut table = new_table();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Match keys (first file)"),
        header_cell("Match keys (second file)"),
        header_cell("Compare column (first file)"),
        header_cell("Compare column (second file)"),
        header_cell("Tolerance"),
    ]);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(&summary.name).add_attribute(Attribute::Bold),
            Cell::new(&summary.match_keys_first),
            Cell::new(&summary.match_keys_second),
            Cell::new(&summary.compare_col_first),
            Cell::new(&summary.compare_col_second),
            Cell::new(&summary.tolerance),
        ]);
    }
    println!("{table}");
}
