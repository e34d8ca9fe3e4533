//! Latency measurements and per-endpoint summaries

use crate::stats;
use crate::types::{PerformanceLevel, RequestStatus, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single request/measure cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleMeasurement {
    /// Recorded elapsed time in milliseconds (the sentinel for failed cycles)
    pub elapsed_ms: f64,

    /// Cycle outcome
    pub status: RequestStatus,

    /// Size of the decoded payload, serialized back to JSON (0 on failure)
    pub payload_bytes: usize,

    /// Error message if the cycle failed
    pub error_message: Option<String>,

    /// When the cycle was dispatched
    pub timestamp: DateTime<Utc>,
}

impl SampleMeasurement {
    /// A cycle that completed with a decoded body
    pub fn success(elapsed: Duration, payload_bytes: usize) -> Self {
        Self {
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            status: RequestStatus::Success,
            payload_bytes,
            error_message: None,
            timestamp: Utc::now(),
        }
    }

    /// A failed cycle, recorded as the failure sentinel
    pub fn failed(error_message: String) -> Self {
        Self {
            elapsed_ms: crate::defaults::FAILURE_SENTINEL_MS,
            status: RequestStatus::Failed,
            payload_bytes: 0,
            error_message: Some(error_message),
            timestamp: Utc::now(),
        }
    }

    pub fn is_successful(&self) -> bool {
        self.status == RequestStatus::Success
    }
}

/// Median, 95th percentile and mean of a sample set (milliseconds, unrounded)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub median_ms: f64,
    pub p95_ms: f64,
    pub average_ms: f64,
}

impl Summary {
    /// Derive a summary from a non-empty sample set
    pub fn from_samples(samples: &[f64]) -> Result<Self> {
        Ok(Self {
            median_ms: stats::median(samples)?,
            p95_ms: stats::percentile(samples, 95.0)?,
            average_ms: stats::mean(samples)?,
        })
    }

    /// Same summary with every value rounded to two decimals for display
    pub fn rounded(&self) -> Self {
        Self {
            median_ms: stats::round2(self.median_ms),
            p95_ms: stats::round2(self.p95_ms),
            average_ms: stats::round2(self.average_ms),
        }
    }
}

/// Result of sampling one endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointReport {
    /// Endpoint label
    pub name: String,

    /// Endpoint URL
    pub url: String,

    /// One entry per cycle, in dispatch order
    pub measurements: Vec<SampleMeasurement>,

    /// Statistics over all recorded values, sentinels included
    pub summary: Summary,

    /// Payload size of the last successful decode (0 if none succeeded)
    pub size_bytes: usize,

    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl EndpointReport {
    /// Recorded elapsed times, in order
    pub fn samples(&self) -> Vec<f64> {
        self.measurements.iter().map(|m| m.elapsed_ms).collect()
    }

    pub fn failure_count(&self) -> usize {
        self.measurements.iter().filter(|m| !m.is_successful()).count()
    }

    pub fn success_count(&self) -> usize {
        self.measurements.len() - self.failure_count()
    }

    pub fn performance_level(&self) -> PerformanceLevel {
        PerformanceLevel::from_average_ms(self.summary.average_ms, self.failure_count())
    }

    /// (label, average) pair fed to the chart sink
    pub fn chart_point(&self) -> (String, f64) {
        (self.name.clone(), stats::round2(self.summary.average_ms))
    }
}
