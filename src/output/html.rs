//! HTML rendering for query outcomes and benchmark tables
//!
//! Everything goes through [`Markup`], which escapes text on the way in.
//! Unescaped output is limited to fixed tags built in this module and the
//! thumbnail path, which only accepts values that parse as https URLs.

use super::formatter::{completed_message, rows_message, EMPTY_INPUT_MESSAGE};
use crate::models::{CellValue, EndpointReport, QueryOutcome, ResultSet};
use std::fmt;
use url::Url;

/// Escape text for use in element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// An HTML fragment; text pushed into it is escaped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment holding escaped text
    pub fn text(text: &str) -> Self {
        Self(escape(text))
    }

    pub fn push_text(&mut self, text: &str) {
        self.0.push_str(&escape(text));
    }

    pub fn push_markup(&mut self, markup: &Markup) {
        self.0.push_str(&markup.0);
    }

    /// Append a fixed fragment written in this crate
    pub(crate) fn push_trusted(&mut self, fragment: &str) {
        self.0.push_str(fragment);
    }

    /// Append `<tag>text</tag>` with the text escaped
    pub(crate) fn element(&mut self, tag: &str, text: &str) {
        self.0.push('<');
        self.0.push_str(tag);
        self.0.push('>');
        self.push_text(text);
        self.0.push_str("</");
        self.0.push_str(tag);
        self.0.push('>');
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// URL to show as a thumbnail, if this cell qualifies for one
///
/// The column name (any case) must mention "image" or "imagen", or the text
/// must start with `https://`; in both cases the text has to parse as an
/// https URL. The normalized form is returned.
pub fn thumbnail_url(column: &str, cell: &CellValue) -> Option<Url> {
    let text = cell.as_text()?.trim();
    let column = column.to_lowercase();
    let image_column = column.contains("image") || column.contains("imagen");

    if !image_column && !text.starts_with("https://") {
        return None;
    }

    Url::parse(text).ok().filter(|url| url.scheme() == "https")
}

fn render_cell(out: &mut Markup, column: &str, cell: &CellValue) {
    match thumbnail_url(column, cell) {
        Some(url) => {
            out.push_trusted("<td><img src=\"");
            out.push_text(url.as_str());
            out.push_trusted(
                "\" alt=\"thumbnail\" width=\"80\" height=\"80\" style=\"border-radius:8px; box-shadow:0 2px 6px rgba(0,0,0,0.2);\"></td>",
            );
        }
        None => out.element("td", &cell.to_string()),
    }
}

/// Header from the column names, one row per tuple
pub fn render_result_table(result: &ResultSet) -> Markup {
    let mut out = Markup::new();
    out.push_trusted("<table class=\"results\" border=\"1\" cellspacing=\"0\" cellpadding=\"4\"><tr>");
    for column in &result.columns {
        out.element("th", column);
    }
    out.push_trusted("</tr>");

    for row in &result.rows {
        out.push_trusted("<tr>");
        for (index, cell) in row.iter().enumerate() {
            let column = result.columns.get(index).map(String::as_str).unwrap_or("");
            render_cell(&mut out, column, cell);
        }
        out.push_trusted("</tr>");
    }

    out.push_trusted("</table>");
    out
}

/// Fragment for any console outcome
pub fn render_query_outcome(outcome: &QueryOutcome) -> Markup {
    let mut out = Markup::new();
    match outcome {
        QueryOutcome::EmptyInput => {
            out.push_trusted("<p class=\"status\">");
            out.push_text(EMPTY_INPUT_MESSAGE);
            out.push_trusted("</p>");
        }
        QueryOutcome::Completed { elapsed } => {
            out.push_trusted("<p class=\"status\">");
            out.push_text(&completed_message(*elapsed));
            out.push_trusted("</p>");
        }
        QueryOutcome::Rows { result, elapsed } => {
            out.push_markup(&render_result_table(result));
            out.push_trusted("<p class=\"status\">");
            out.push_text(&rows_message(result, *elapsed));
            out.push_trusted("</p>");
        }
        QueryOutcome::Failed { message } => {
            out.push_trusted("<p class=\"error\" style=\"color:red;\">Error: ");
            out.push_text(message);
            out.push_trusted("</p>");
        }
    }
    out
}

/// One row per endpoint: name, median, p95, average (ms, 2 decimals), size
pub fn render_benchmark_table(reports: &[EndpointReport]) -> Markup {
    let mut out = Markup::new();
    out.push_trusted("<table class=\"benchmark\" border=\"1\" cellspacing=\"0\" cellpadding=\"4\"><tr>");
    for header in ["Endpoint", "Median (ms)", "P95 (ms)", "Average (ms)", "Size (bytes)"] {
        out.element("th", header);
    }
    out.push_trusted("</tr>");

    for report in reports {
        let summary = report.summary.rounded();
        out.push_trusted("<tr>");
        out.element("td", &report.name);
        out.element("td", &format!("{:.2}", summary.median_ms));
        out.element("td", &format!("{:.2}", summary.p95_ms));
        out.element("td", &format!("{:.2}", summary.average_ms));
        out.element("td", &report.size_bytes.to_string());
        out.push_trusted("</tr>");
    }

    out.push_trusted("</table>");
    out
}
