//! Benchmark endpoint descriptor

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named URL measured by the latency sampler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Display label
    pub name: String,
    /// Target URL
    pub url: String,
}

impl Endpoint {
    pub fn new<N: Into<String>, U: Into<String>>(name: N, url: U) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Check that the name is non-empty and the URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Endpoint name cannot be empty"));
        }

        let parsed = url::Url::parse(&self.url)
            .map_err(|e| AppError::validation(format!("Invalid URL for endpoint '{}': {}", self.name, e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(AppError::validation(format!(
                "Endpoint '{}' uses unsupported scheme '{}'",
                self.name, other
            ))),
        }
    }

    /// Parse a comma separated list of `name=url` specs
    pub fn parse_list(value: &str) -> Result<Vec<Self>> {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for Endpoint {
    type Err = AppError;

    /// Parses `name=url`; the URL may itself contain `=` (query strings)
    fn from_str(s: &str) -> Result<Self> {
        let (name, url) = s
            .split_once('=')
            .ok_or_else(|| AppError::parse(format!("Endpoint '{}' must look like name=url", s)))?;

        let endpoint = Endpoint::new(name.trim(), url.trim());
        endpoint.validate()?;
        Ok(endpoint)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}
