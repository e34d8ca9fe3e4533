//! Data models and structures for api-lab

pub mod character;
pub mod config;
pub mod endpoint;
pub mod metrics;
pub mod query;

// Re-export main model types
pub use character::{ApiCharacter, ApiPage, CharacterRow, NamedRef, PageInfo};
pub use config::Config;
pub use endpoint::Endpoint;
pub use metrics::{EndpointReport, SampleMeasurement, Summary};
pub use query::{CellValue, QueryOutcome, ResultSet};
