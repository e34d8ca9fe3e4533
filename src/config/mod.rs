//! Configuration management: defaults, .env file, environment and CLI flags

pub mod env;
pub mod parser;

pub use env::EnvManager;
pub use parser::{display_config_summary, load_config, ConfigParser};
