//! Configuration data model and validation

use crate::models::endpoint::Endpoint;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the REST API (no trailing slash required)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Explicit benchmark endpoints; empty means the defaults under `api_base_url`
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,

    /// Number of request/measure cycles per endpoint
    #[serde(default = "default_sample_count")]
    pub sample_count: u32,

    /// Optional per-request timeout; `None` keeps the HTTP client default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            endpoints: Vec::new(),
            sample_count: default_sample_count(),
            timeout_seconds: None,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Join a path onto the API base URL
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Endpoints the sampler should measure, in order
    pub fn benchmark_endpoints(&self) -> Vec<Endpoint> {
        if !self.endpoints.is_empty() {
            return self.endpoints.clone();
        }

        crate::defaults::DEFAULT_ENDPOINTS
            .iter()
            .map(|(name, path)| Endpoint::new(*name, self.api_url(path)))
            .collect()
    }

    /// First page of the paginated character listing
    pub fn character_listing_url(&self) -> String {
        self.api_url(crate::defaults::CHARACTER_LISTING_PATH)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(AppError::config("API base URL cannot be empty"));
        }

        match url::Url::parse(&self.api_base_url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "API base URL must use http or https: {}",
                        self.api_base_url
                    )));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Invalid API base URL '{}': {}",
                    self.api_base_url, e
                )));
            }
        }

        for endpoint in &self.endpoints {
            endpoint.validate()?;
        }

        if self.sample_count == 0 {
            return Err(AppError::config("Sample count must be greater than 0"));
        }

        if self.sample_count > crate::defaults::MAX_SAMPLE_COUNT {
            return Err(AppError::config(format!(
                "Sample count cannot exceed {}",
                crate::defaults::MAX_SAMPLE_COUNT
            )));
        }

        if let Some(timeout) = self.timeout_seconds {
            if timeout == 0 {
                return Err(AppError::config("Timeout must be greater than 0"));
            }
            if timeout > crate::defaults::MAX_TIMEOUT_SECS {
                return Err(AppError::config(format!(
                    "Timeout cannot exceed {} seconds",
                    crate::defaults::MAX_TIMEOUT_SECS
                )));
            }
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("API_BASE_URL") {
            let base_url = base_url.trim();
            if !base_url.is_empty() {
                self.api_base_url = base_url.to_string();
            }
        }

        if let Ok(endpoints) = std::env::var("BENCH_ENDPOINTS") {
            self.endpoints = Endpoint::parse_list(&endpoints)
                .map_err(|e| AppError::config(format!("Invalid BENCH_ENDPOINTS value: {}", e)))?;
        }

        if let Ok(sample_count) = std::env::var("SAMPLE_COUNT") {
            self.sample_count = sample_count.trim().parse().map_err(|e| {
                AppError::config(format!("Invalid SAMPLE_COUNT value '{}': {}", sample_count, e))
            })?;
        }

        if let Ok(timeout) = std::env::var("TIMEOUT_SECONDS") {
            let timeout = timeout.trim();
            self.timeout_seconds = if timeout.is_empty() {
                None
            } else {
                Some(timeout.parse().map_err(|e| {
                    AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", timeout, e))
                })?)
            };
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse().map_err(|e| {
                AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e))
            })?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_api_base_url() -> String {
    crate::defaults::DEFAULT_API_BASE_URL.to_string()
}

fn default_sample_count() -> u32 {
    crate::defaults::DEFAULT_SAMPLE_COUNT
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
