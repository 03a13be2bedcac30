//! Plain-text rendering of query results.
//!
//! Renders result sets as grid tables with column headers, auto-sized
//! columns, right-aligned numbers and `NULL` for missing values.

use std::time::Duration;

use unicode_width::UnicodeWidthStr;

use crate::db::{QueryResult, Value};

/// Renders a query result as a grid table.
pub struct ResultTable<'a> {
    result: &'a QueryResult,
}

impl<'a> ResultTable<'a> {
    /// Creates a new result table.
    pub fn new(result: &'a QueryResult) -> Self {
        Self { result }
    }

    /// Calculates the display width of each column.
    fn calculate_column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .result
            .columns
            .iter()
            .map(|col| display_width(&col.name))
            .collect();

        for row in &self.result.rows {
            for (i, value) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(display_width(&cell_text(value)));
                }
            }
        }

        widths
    }

    /// Renders the table, one line per element.
    pub fn render_to_lines(&self) -> Vec<String> {
        if self.result.columns.is_empty() {
            return Vec::new();
        }

        let widths = self.calculate_column_widths();
        let mut lines = Vec::with_capacity(self.result.rows.len() * 2 + 3);

        lines.push(border(&widths, '-'));

        let headers: Vec<(String, bool)> = self
            .result
            .columns
            .iter()
            .map(|col| (col.name.clone(), false))
            .collect();
        lines.push(render_cells(&headers, &widths));
        lines.push(border(&widths, '='));

        for row in &self.result.rows {
            let cells: Vec<(String, bool)> = (0..widths.len())
                .map(|i| match row.get(i) {
                    Some(value) => (cell_text(value), value.is_numeric()),
                    None => (String::new(), false),
                })
                .collect();
            lines.push(render_cells(&cells, &widths));
            lines.push(border(&widths, '-'));
        }

        lines
    }

    /// Renders the table as a single string.
    pub fn render(&self) -> String {
        self.render_to_lines().join("\n")
    }
}

/// Formats the complete output for a successful execution.
///
/// Result sets get a table and a row count, empty result sets a notice that
/// names their columns, and commands a confirmation.
pub fn format_result(result: &QueryResult, elapsed: Duration) -> String {
    let millis = elapsed.as_millis();

    if result.is_command() {
        return format!(
            "Command executed successfully ({} row{} affected, {millis}ms)",
            result.rows_affected,
            plural(result.rows_affected as usize)
        );
    }

    if result.is_empty() {
        if result.columns.is_empty() {
            return format!("Query OK, but no rows were returned ({millis}ms)");
        }
        return format!(
            "Query OK, but no rows were returned (columns: {}) ({millis}ms)",
            result.column_names().join(", ")
        );
    }

    format!(
        "{}\n{} row{} returned ({millis}ms)",
        ResultTable::new(result).render(),
        result.row_count,
        plural(result.row_count)
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Text shown in a cell; control characters would break the grid.
fn cell_text(value: &Value) -> String {
    value
        .to_display_string()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Terminal columns occupied by `s`; CJK and other wide characters take two.
fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat(fill).take(width + 2));
        line.push('+');
    }
    line
}

fn render_cells(cells: &[(String, bool)], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for ((text, right_align), width) in cells.iter().zip(widths) {
        let padding = " ".repeat(width.saturating_sub(display_width(text)));
        line.push(' ');
        if *right_align {
            line.push_str(&padding);
            line.push_str(text);
        } else {
            line.push_str(text);
            line.push_str(&padding);
        }
        line.push_str(" |");
    }
    line
}
