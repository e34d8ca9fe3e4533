//! Output formatting and display
//!
//! Terminal tables (plain or colored), HTML rendering with escaping by
//! default, the bar chart sink and the single-line status channel.

mod chart;
mod colored;
mod formatter;
pub mod html;
mod report;

pub use chart::{BarChart, ChartSink};
pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{
    Alignment, Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat,
};
pub use html::Markup;
pub use report::HtmlReport;

use std::sync::Mutex;

/// Single mutable status line
pub trait StatusSink: Send + Sync {
    /// Replace the current status text
    fn set(&self, text: &str);
}

/// Status line written to stderr so stdout stays clean for results
pub struct ConsoleStatus {
    use_color: bool,
}

impl ConsoleStatus {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }
}

impl StatusSink for ConsoleStatus {
    fn set(&self, text: &str) {
        if self.use_color {
            use ::colored::Colorize;
            eprintln!("{}", text.dimmed());
        } else {
            eprintln!("{}", text);
        }
    }
}

/// Status sink that keeps every message, newest last
#[derive(Debug, Default)]
pub struct MemoryStatus {
    history: Mutex<Vec<String>>,
}

impl MemoryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages set so far
    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    /// The message currently displayed
    pub fn current(&self) -> Option<String> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }
}

impl StatusSink for MemoryStatus {
    fn set(&self, text: &str) {
        if let Ok(mut history) = self.history.lock() {
            history.push(text.to_string());
        }
    }
}

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..Default::default()
        };

        if enable_color && ColoredFormatter::supports_color() {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(FormattingOptions {
                enable_color: false,
                ..options
            }))
        }
    }

    /// Create a plain text formatter for scripts and tests
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}
