//! Session context shared by the bench, query and console flows
//!
//! A [`Session`] owns the HTTP client handle, the in-memory database, the
//! status sink and the chart sink. Every operation takes `&mut self`, so two
//! loads or benchmarks can never overlap.

use crate::{
    client::HttpClient,
    console::QueryConsole,
    db::Database,
    error::Result,
    loader::{LoadReport, RowLoader},
    models::{Config, EndpointReport, QueryOutcome},
    output::{ChartSink, StatusSink},
    sampler::LatencySampler,
};
use std::sync::Arc;

pub struct Session {
    config: Config,
    client: Arc<dyn HttpClient>,
    database: Database,
    status: Arc<dyn StatusSink>,
    chart: ChartSink,
    last_outcome: Option<QueryOutcome>,
}

impl Session {
    /// Open the database and create the schema
    pub fn open(config: Config, client: Arc<dyn HttpClient>, status: Arc<dyn StatusSink>) -> Result<Self> {
        let database = Database::open_in_memory()?;
        status.set("Database ready.");

        Ok(Self {
            config,
            client,
            database,
            status,
            chart: ChartSink::new("latency-chart", "Average latency (ms)"),
            last_outcome: None,
        })
    }

    /// Release the database
    pub fn close(self) -> Result<()> {
        self.database.close()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn chart(&self) -> &ChartSink {
        &self.chart
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn last_outcome(&self) -> Option<&QueryOutcome> {
        self.last_outcome.as_ref()
    }

    /// Clear the table and load every page of the character listing
    pub async fn load_data(&mut self) -> Result<LoadReport> {
        let loader = RowLoader::new(Arc::clone(&self.client), &self.config);
        let start_url = self.config.character_listing_url();
        loader
            .load_all(&start_url, &mut self.database, self.status.as_ref())
            .await
    }

    /// Run query text through the console and remember the outcome
    pub fn run_query(&mut self, text: &str) -> QueryOutcome {
        let outcome = QueryConsole::run_query(&mut self.database, text);
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    /// Sample every configured endpoint and feed the averages to the chart
    pub async fn run_benchmark(&mut self) -> Result<Vec<EndpointReport>> {
        let sampler = LatencySampler::new(Arc::clone(&self.client), &self.config);
        let endpoints = self.config.benchmark_endpoints();
        let reports = sampler
            .run(&endpoints, self.config.sample_count, self.status.as_ref())
            .await?;

        let points: Vec<(String, f64)> = reports.iter().map(|r| r.chart_point()).collect();
        self.chart.render(&points);

        Ok(reports)
    }
}
