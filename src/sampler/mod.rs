//! Latency sampler
//!
//! Issues N sequential GET requests per endpoint and records the wall-clock
//! time from just before dispatch to just after the JSON body is decoded.
//! A failed cycle records [`defaults::FAILURE_SENTINEL_MS`] and the run
//! continues; there is no retry and no fan-out.

use crate::{
    client::HttpClient,
    defaults,
    error::{AppError, Result},
    logging::NetworkLogger,
    models::{Config, Endpoint, EndpointReport, SampleMeasurement, Summary},
    output::StatusSink,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// Times repeated requests against benchmark endpoints
pub struct LatencySampler {
    client: Arc<dyn HttpClient>,
    network: NetworkLogger,
}

impl LatencySampler {
    pub fn new(client: Arc<dyn HttpClient>, config: &Config) -> Self {
        Self {
            client,
            network: NetworkLogger::new(config),
        }
    }

    /// Run `samples` request/measure cycles against one endpoint
    pub async fn measure_endpoint(
        &self,
        endpoint: &Endpoint,
        samples: u32,
        status: &dyn StatusSink,
    ) -> Result<EndpointReport> {
        if samples == 0 {
            return Err(AppError::validation("Sample count must be at least 1"));
        }

        let started_at = Utc::now();
        let mut measurements = Vec::with_capacity(samples as usize);
        let mut size_bytes = 0;

        for cycle in 1..=samples {
            status.set(&format!("Measuring {} ({}/{})...", endpoint.name, cycle, samples));

            let start = Instant::now();
            let outcome = self.client.get_json(&endpoint.url).await;
            let elapsed = start.elapsed();

            match outcome {
                Ok(response) => {
                    let payload_bytes = response.serialized_len();
                    size_bytes = payload_bytes;

                    let measurement = SampleMeasurement::success(elapsed, payload_bytes);
                    self.network
                        .log_http_request(&response.final_url, Some(response.status_code), measurement.elapsed_ms)
                        .await;
                    self.network
                        .log_sample(&endpoint.name, cycle, samples, &measurement, None)
                        .await;
                    measurements.push(measurement);
                }
                Err(error) => {
                    let measurement = SampleMeasurement::failed(error.to_string());
                    self.network
                        .log_sample(&endpoint.name, cycle, samples, &measurement, Some(&error))
                        .await;
                    measurements.push(measurement);
                }
            }
        }

        let values: Vec<f64> = measurements.iter().map(|m| m.elapsed_ms).collect();
        let summary = Summary::from_samples(&values)?;

        Ok(EndpointReport {
            name: endpoint.name.clone(),
            url: endpoint.url.clone(),
            measurements,
            summary,
            size_bytes,
            started_at,
            completed_at: Utc::now(),
        })
    }

    /// Measure every endpoint in order, then report "Done"
    pub async fn run(
        &self,
        endpoints: &[Endpoint],
        samples: u32,
        status: &dyn StatusSink,
    ) -> Result<Vec<EndpointReport>> {
        let mut reports = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            reports.push(self.measure_endpoint(endpoint, samples, status).await?);
        }

        status.set("Done");
        Ok(reports)
    }
}

/// Sentinel check used by callers that want to flag failed cycles
pub fn is_sentinel(value: f64) -> bool {
    value == defaults::FAILURE_SENTINEL_MS
}
