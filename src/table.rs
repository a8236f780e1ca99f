//! Plain-text table rendering for CLI output.

use std::borrow::Cow;
use std::fmt::Write as _;

const COLUMN_GAP: &str = "  ";
const MIN_SEPARATOR_WIDTH: usize = 3;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let widths = column_widths(headers, rows);
    let separator: Vec<String> = widths
        .iter()
        .map(|w| "-".repeat((*w).max(MIN_SEPARATOR_WIDTH)))
        .collect();
    let separator_widths: Vec<usize> =
        widths.iter().map(|w| (*w).max(MIN_SEPARATOR_WIDTH)).collect();

    let mut output = String::new();
    let _ = writeln!(output, "{}", render_row(headers, &widths));
    let _ = writeln!(output, "{}", render_row(&separator, &separator_widths));
    for row in rows {
        let _ = writeln!(output, "{}", render_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn column_widths(headers: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).max(1);
    }
    widths
}

/// Renders one line, padding each cell to its column width. Rows narrower
/// than the header render trailing empty cells; wider rows are cut off.
fn render_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (idx, width) in widths.iter().enumerate() {
        if idx > 0 {
            line.push_str(COLUMN_GAP);
        }
        let cell = sanitize_cell(cells.get(idx).map(String::as_str).unwrap_or(""));
        let padding = width.saturating_sub(cell.chars().count());
        line.push_str(&cell);
        line.push_str(&" ".repeat(padding));
    }
    line.truncate(line.trim_end().len());
    line
}

fn sanitize_cell(cell: &str) -> Cow<'_, str> {
    if cell.contains(['\n', '\r', '\t']) {
        Cow::Owned(
            cell.chars()
                .map(|ch| match ch {
                    '\n' | '\r' | '\t' => ' ',
                    other => other,
                })
                .collect(),
        )
    } else {
        Cow::Borrowed(cell)
    }
}
