//! Overview rendering
//!
//! Text table and JSON output for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::overview::Overview;
use std::fmt::Write;

const HEADERS: [&str; 4] = ["REPOSITORY", "PATH", "PERMISSION", "ROLE"];

/// Render an overview in the requested format
pub fn render(overview: &Overview, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(overview)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(overview)?),
    }
}

/// Aligned table with one row per entry, grouped by repository
pub fn render_table(overview: &Overview) -> String {
    if overview.is_empty() {
        return "no permissions\n".to_string();
    }

    let rows: Vec<[&str; 4]> = overview
        .iter()
        .flat_map(|(repository, entries)| {
            entries.iter().map(move |entry| {
                [
                    repository,
                    entry.path.as_str(),
                    entry.permission_label(),
                    entry.role_name.as_str(),
                ]
            })
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS, &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[&str; 4], widths: &[usize; 4]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i + 1 == cells.len() {
            line.push_str(cell);
        } else {
            // Writing to a String cannot fail
            let _ = write!(line, "{:<width$}  ", cell, width = *width);
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
