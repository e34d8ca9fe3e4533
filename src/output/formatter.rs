//! Core formatting traits and the plain text implementation
//!
//! The plain formatter renders bordered text tables for benchmark reports
//! and query results. The colored formatter builds on the same tables.

use crate::{
    error::{AppError, Result},
    loader::LoadReport,
    models::{EndpointReport, QueryOutcome, ResultSet},
};
use std::fmt::Write as _;
use std::time::Duration;

/// Text shown when the console receives blank input
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a SQL query.";

/// Message for a query that ran without producing rows
pub fn completed_message(elapsed: Duration) -> String {
    format!(
        "Query executed successfully in {:.2} ms (no results).",
        elapsed.as_secs_f64() * 1000.0
    )
}

/// Footer line under a result table
pub fn rows_message(result: &ResultSet, elapsed: Duration) -> String {
    let noun = if result.row_count() == 1 { "row" } else { "rows" };
    format!(
        "{} {} in {:.2} ms",
        result.row_count(),
        noun,
        elapsed.as_secs_f64() * 1000.0
    )
}

/// Trait for formatting results in different styles
pub trait OutputFormatter {
    /// Format a section header
    fn format_header(&self, title: &str) -> Result<String>;

    /// One row per endpoint: name, median, p95, average, size
    fn format_benchmark_table(&self, reports: &[EndpointReport]) -> Result<String>;

    /// Table, message or error for a console outcome
    fn format_query_outcome(&self, outcome: &QueryOutcome) -> Result<String>;

    /// One-line summary of a load cycle
    fn format_load_report(&self, report: &LoadReport) -> Result<String>;

    fn format_error(&self, error: &str) -> Result<String>;

    fn format_warning(&self, warning: &str) -> Result<String>;

    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Add per-endpoint failure counts and cycle details
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Widest a query result cell may get before it is cut
    pub max_cell_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_cell_width: 48,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
    pub show_header: bool,
    /// Width cap for cells beyond the declared columns
    pub max_column_width: usize,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
    pub max_width: usize,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width: 0,
            max_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Column layout of the benchmark table
    pub(crate) fn benchmark_format(&self) -> TableFormat {
        let mut columns = vec![
            Column::new("Endpoint", Alignment::Left, 32),
            Column::new("Median (ms)", Alignment::Right, 14),
            Column::new("P95 (ms)", Alignment::Right, 14),
            Column::new("Average (ms)", Alignment::Right, 14),
            Column::new("Size (bytes)", Alignment::Right, 14),
        ];
        if self.options.verbose_mode {
            columns.push(Column::new("Failures", Alignment::Right, 10));
            columns.push(Column::new("Rating", Alignment::Left, 10));
        }

        TableFormat {
            columns,
            show_borders: self.options.table_borders,
            show_header: true,
            max_column_width: 14,
        }
    }

    /// Benchmark table cells, values rounded to two decimals
    pub(crate) fn benchmark_rows(&self, reports: &[EndpointReport]) -> Vec<RowData> {
        reports
            .iter()
            .map(|report| {
                let summary = report.summary.rounded();
                let mut row = vec![
                    report.name.clone(),
                    format!("{:.2}", summary.median_ms),
                    format!("{:.2}", summary.p95_ms),
                    format!("{:.2}", summary.average_ms),
                    report.size_bytes.to_string(),
                ];
                if self.options.verbose_mode {
                    row.push(format!("{}/{}", report.failure_count(), report.measurements.len()));
                    row.push(report.performance_level().description().to_string());
                }
                row
            })
            .collect()
    }

    /// Render a result set as a text table
    pub(crate) fn result_table(&self, result: &ResultSet) -> Result<String> {
        let format = TableFormat {
            columns: result
                .columns
                .iter()
                .map(|name| Column::new(name, Alignment::Left, self.options.max_cell_width))
                .collect(),
            show_borders: self.options.table_borders,
            show_header: true,
            max_column_width: self.options.max_cell_width,
        };
        let rows: Vec<RowData> = result
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        self.create_table(&format, &rows)
    }

    /// Create a table with the given format and data
    pub fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> Result<String> {
        if rows.is_empty() && !format.show_header {
            return Ok(String::new());
        }

        let column_widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        Ok(output.trim_end_matches('\n').to_string())
    }

    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format
            .columns
            .len()
            .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

        (0..num_columns)
            .map(|col_idx| {
                let (mut width, cap) = match format.columns.get(col_idx) {
                    Some(col) => (col.min_width.max(display_width(&col.header)), col.max_width),
                    None => (0, format.max_column_width),
                };

                for row in rows {
                    if let Some(cell) = row.get(col_idx) {
                        width = width.max(display_width(cell));
                    }
                }

                width.min(cap)
            })
            .collect()
    }

    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, &width) in widths.iter().enumerate() {
            let cell = data.get(idx).map(String::as_str).unwrap_or("");
            let alignment = format
                .columns
                .get(idx)
                .map(|c| &c.alignment)
                .unwrap_or(&Alignment::Left);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&align_text(cell, width, alignment));
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

/// Pad or cut `text` to exactly `width` characters
pub(crate) fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
    let len = display_width(text);
    if len > width {
        if width <= 3 {
            return text.chars().take(width).collect();
        }
        let cut: String = text.chars().take(width - 3).collect();
        return format!("{}...", cut);
    }

    let padding = width - len;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

fn write_err(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(display_width(title) + 4);

        writeln!(output, "{}", border).map_err(write_err)?;
        writeln!(output, "  {}  ", title).map_err(write_err)?;
        write!(output, "{}", border).map_err(write_err)?;

        Ok(output)
    }

    fn format_benchmark_table(&self, reports: &[EndpointReport]) -> Result<String> {
        if reports.is_empty() {
            return Ok("No endpoints measured.".to_string());
        }

        let format = self.benchmark_format();
        let rows = self.benchmark_rows(reports);
        self.create_table(&format, &rows)
    }

    fn format_query_outcome(&self, outcome: &QueryOutcome) -> Result<String> {
        match outcome {
            QueryOutcome::EmptyInput => self.format_warning(EMPTY_INPUT_MESSAGE),
            QueryOutcome::Completed { elapsed } => self.format_success(&completed_message(*elapsed)),
            QueryOutcome::Rows { result, elapsed } => {
                let mut output = self.result_table(result)?;
                write!(output, "\n{}", rows_message(result, *elapsed)).map_err(write_err)?;
                Ok(output)
            }
            QueryOutcome::Failed { message } => self.format_error(message),
        }
    }

    fn format_load_report(&self, report: &LoadReport) -> Result<String> {
        if report.is_complete() {
            self.format_success(&report.to_string())
        } else {
            self.format_warning(&report.to_string())
        }
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(message.to_string())
    }
}
