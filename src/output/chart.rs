//! Bar chart sink for benchmark averages
//!
//! Holds at most one chart. The first render creates it; later renders
//! replace its data in place and bump the revision. The chart is emitted as
//! a Chart.js configuration embedded in the HTML report.

use super::html::{escape, Markup};
use crate::error::Result;
use serde::Serialize;
use serde_json::json;

/// Labelled series shown as one bar per label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub id: String,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// 1 on creation, incremented by every update
    pub revision: u32,
}

impl BarChart {
    /// Chart.js configuration, safe to place inside a `<script>` element
    pub fn config_json(&self) -> Result<String> {
        let config = json!({
            "type": "bar",
            "data": {
                "labels": self.labels,
                "datasets": [{
                    "label": self.title,
                    "data": self.values,
                    "backgroundColor": "rgba(54, 162, 235, 0.5)",
                    "borderColor": "rgba(54, 162, 235, 1)",
                    "borderWidth": 1
                }]
            },
            "options": {
                "responsive": true,
                "plugins": { "legend": { "display": false } },
                "scales": {
                    "y": {
                        "beginAtZero": true,
                        "title": { "display": true, "text": "Average (ms)" }
                    }
                }
            }
        });

        // `<` can only occur inside JSON strings, where the unicode escape reads the same
        Ok(serde_json::to_string(&config)?.replace('<', "\\u003c"))
    }
}

/// Owns the single chart instance
#[derive(Debug)]
pub struct ChartSink {
    id: String,
    title: String,
    chart: Option<BarChart>,
}

impl ChartSink {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            chart: None,
        }
    }

    /// Create the chart on first use, otherwise update it in place
    pub fn render(&mut self, points: &[(String, f64)]) -> &BarChart {
        let labels: Vec<String> = points.iter().map(|(label, _)| label.clone()).collect();
        let values: Vec<f64> = points.iter().map(|(_, value)| *value).collect();

        let (id, title) = (&self.id, &self.title);
        let chart = self.chart.get_or_insert_with(|| BarChart {
            id: id.clone(),
            title: title.clone(),
            labels: Vec::new(),
            values: Vec::new(),
            revision: 0,
        });

        chart.labels = labels;
        chart.values = values;
        chart.revision += 1;
        chart
    }

    pub fn chart(&self) -> Option<&BarChart> {
        self.chart.as_ref()
    }

    /// Number of chart instances held (0 or 1)
    pub fn instance_count(&self) -> usize {
        usize::from(self.chart.is_some())
    }

    /// Canvas plus the script that draws it, or nothing before the first render
    pub fn to_markup(&self) -> Result<Option<Markup>> {
        let Some(chart) = &self.chart else {
            return Ok(None);
        };

        let id = escape(&chart.id);
        let mut out = Markup::new();
        out.push_trusted(&format!("<div class=\"chart-container\"><canvas id=\"{}\"></canvas></div>", id));
        out.push_trusted(&format!(
            "<script>new Chart(document.getElementById('{}').getContext('2d'), {});</script>",
            id,
            chart.config_json()?
        ));
        Ok(Some(out))
    }
}
