//! api-lab
//!
//! Two small tools around a public REST API: a latency sampler that times
//! repeated GET requests and summarises them (median, p95, average), and a
//! query console that loads paginated API records into an in-memory SQLite
//! table so they can be explored with ad-hoc SQL.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod output;
pub mod sampler;
pub mod session;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, Endpoint, EndpointReport, Summary, CharacterRow, ResultSet, CellValue, QueryOutcome};
pub use sampler::LatencySampler;
pub use loader::{RowLoader, LoadReport};
pub use console::QueryConsole;
pub use session::Session;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    /// Public API the tool talks to when nothing else is configured
    pub const DEFAULT_API_BASE_URL: &str = "https://rickandmortyapi.com/api";

    /// Benchmark endpoints as (name, path relative to the base URL)
    pub const DEFAULT_ENDPOINTS: &[(&str, &str)] = &[
        ("Lambda", "character?page=1"),
        ("Kappa", "location?page=1"),
        ("API", "episode?page=1"),
    ];

    /// Paginated listing loaded into the query console
    pub const CHARACTER_LISTING_PATH: &str = "character?page=1";

    pub const DEFAULT_SAMPLE_COUNT: u32 = 5;
    pub const MAX_SAMPLE_COUNT: u32 = 100;
    pub const MAX_TIMEOUT_SECS: u64 = 300;
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Elapsed time recorded for a failed request cycle (milliseconds)
    pub const FAILURE_SENTINEL_MS: f64 = 99999.0;

    pub const USER_AGENT: &str = concat!("api-lab/", env!("CARGO_PKG_VERSION"));
}
