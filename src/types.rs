//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Outcome of a single request/measure cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Response received with a success status and a decodable body
    Success,
    /// Network error, non-success status or undecodable body
    Failed,
}

/// Latency classification used for colouring summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceLevel {
    /// Under 100ms
    Fast,
    /// 100ms to 500ms
    Moderate,
    /// 500ms and above
    Slow,
    /// Contains at least one failed cycle
    Failing,
}

impl PerformanceLevel {
    /// Classify an average latency in milliseconds
    pub fn from_average_ms(average_ms: f64, failures: usize) -> Self {
        if failures > 0 {
            Self::Failing
        } else if average_ms < 100.0 {
            Self::Fast
        } else if average_ms < 500.0 {
            Self::Moderate
        } else {
            Self::Slow
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::Moderate => "Moderate",
            Self::Slow => "Slow",
            Self::Failing => "Failing",
        }
    }
}
