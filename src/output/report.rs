//! Standalone HTML page assembled from rendered fragments

use super::chart::ChartSink;
use super::html::Markup;
use crate::error::{ErrorContext, Result};
use chrono::Utc;
use std::path::Path;

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

const STYLE: &str = "body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 2rem; color: #222; }
h1 { margin-bottom: 0.25rem; }
.generated { color: #777; margin-top: 0; }
table { border-collapse: collapse; margin: 1rem 0; }
th { background: #f0f0f0; text-align: left; }
td, th { padding: 4px 8px; }
.error { color: red; }
.chart-container { max-width: 720px; }";

/// HTML document with a title and ordered sections
pub struct HtmlReport {
    title: String,
    sections: Vec<(String, Markup)>,
    uses_chart: bool,
}

impl HtmlReport {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            sections: Vec::new(),
            uses_chart: false,
        }
    }

    /// Append a section under an `<h2>` heading
    pub fn add_section(&mut self, heading: &str, body: Markup) -> &mut Self {
        self.sections.push((heading.to_string(), body));
        self
    }

    /// Append the chart if the sink has rendered one
    pub fn add_chart(&mut self, heading: &str, sink: &ChartSink) -> Result<&mut Self> {
        if let Some(markup) = sink.to_markup()? {
            self.uses_chart = true;
            self.sections.push((heading.to_string(), markup));
        }
        Ok(self)
    }

    pub fn render(&self) -> String {
        let mut page = Markup::new();
        page.push_trusted("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
        page.element("title", &self.title);
        page.push_trusted("\n<style>\n");
        page.push_trusted(STYLE);
        page.push_trusted("\n</style>\n");
        if self.uses_chart {
            page.push_trusted(&format!("<script src=\"{}\"></script>\n", CHART_JS_CDN));
        }
        page.push_trusted("</head>\n<body>\n");

        page.element("h1", &self.title);
        page.push_trusted("\n<p class=\"generated\">");
        page.push_text(&format!(
            "Generated {} by {} {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            crate::PKG_NAME,
            crate::VERSION
        ));
        page.push_trusted("</p>\n");

        for (heading, body) in &self.sections {
            page.push_trusted("<section>\n");
            page.element("h2", heading);
            page.push_trusted("\n");
            page.push_markup(body);
            page.push_trusted("\n</section>\n");
        }

        page.push_trusted("</body>\n</html>\n");
        page.into_string()
    }

    /// Render and write the page to `path`
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render()).with_context(|| format!("Failed to write {}", path.display()))
    }
}
