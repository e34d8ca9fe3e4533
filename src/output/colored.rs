//! Colored formatter with terminal color support
//!
//! Reuses the plain tables and paints them line by line, so column widths
//! are computed on uncolored text.

use super::formatter::{
    completed_message, rows_message, FormattingOptions, OutputFormatter, PlainFormatter,
    EMPTY_INPUT_MESSAGE,
};
use crate::{
    error::Result,
    loader::LoadReport,
    models::{EndpointReport, QueryOutcome},
    types::PerformanceLevel,
};
use colored::*;

impl PerformanceLevel {
    /// Color for this performance level
    pub fn color(&self) -> Color {
        match self {
            Self::Fast => Color::Green,
            Self::Moderate => Color::Yellow,
            Self::Slow => Color::Magenta,
            Self::Failing => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options.clone()),
            options,
            color_scheme,
        }
    }

    /// Check if terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && std::env::var("TERM").map(|term| term != "dumb").unwrap_or(true)
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold color if colors are enabled
    fn bold(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color).bold()
        } else {
            text.normal()
        }
    }

    /// Paint a plain table: borders dimmed, header bold, data rows by `row_color`
    fn paint_table<F>(&self, table: &str, row_color: F) -> String
    where
        F: Fn(usize) -> Option<Color>,
    {
        let mut seen_header = false;
        let mut data_row = 0;

        table
            .lines()
            .map(|line| {
                if line.starts_with('+') {
                    return self.colorize(line, self.color_scheme.border).to_string();
                }
                if !seen_header {
                    seen_header = true;
                    return self.bold(line, self.color_scheme.header).to_string();
                }

                let painted = match row_color(data_row) {
                    Some(color) => self.colorize(line, color).to_string(),
                    None => line.to_string(),
                };
                data_row += 1;
                painted
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "═".repeat(title.chars().count() + 4);
        Ok(format!(
            "{}\n  {}  \n{}",
            self.colorize(&border, self.color_scheme.border),
            self.bold(title, self.color_scheme.header),
            self.colorize(&border, self.color_scheme.border)
        ))
    }

    fn format_benchmark_table(&self, reports: &[EndpointReport]) -> Result<String> {
        if reports.is_empty() {
            return Ok(self.colorize("No endpoints measured.", self.color_scheme.warning).to_string());
        }

        let table = self.plain_formatter.format_benchmark_table(reports)?;
        Ok(self.paint_table(&table, |index| {
            reports.get(index).map(|report| report.performance_level().color())
        }))
    }

    fn format_query_outcome(&self, outcome: &QueryOutcome) -> Result<String> {
        match outcome {
            QueryOutcome::EmptyInput => self.format_warning(EMPTY_INPUT_MESSAGE),
            QueryOutcome::Completed { elapsed } => self.format_success(&completed_message(*elapsed)),
            QueryOutcome::Rows { result, elapsed } => {
                let table = self.plain_formatter.result_table(result)?;
                Ok(format!(
                    "{}\n{}",
                    self.paint_table(&table, |_| None),
                    self.colorize(&rows_message(result, *elapsed), self.color_scheme.info)
                ))
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
        Ok(format!("✗ {}", self.colorize(error, self.color_scheme.error)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("! {}", self.colorize(warning, self.color_scheme.warning)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("✓ {}", self.colorize(message, self.color_scheme.success)))
    }
}
