//! Command-line interface

use crate::config::EnvManager;
use crate::models::Endpoint;
use clap::{ArgAction, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;

/// API Lab - latency sampler and SQL console for public REST APIs
#[derive(Parser, Debug, Clone)]
#[command(name = "api-lab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the REST API
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds (client default when omitted)
    #[arg(short, long, global = true, value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sample endpoint latency and print summary statistics
    Bench(BenchArgs),
    /// Load the character listing and run SQL against it
    Query(QueryArgs),
    /// Interactive SQL console over the loaded rows
    Console(ConsoleArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    /// Request cycles per endpoint
    #[arg(short, long)]
    pub count: Option<u32>,

    /// Endpoint to measure as NAME=URL (can be used multiple times)
    #[arg(long = "endpoint", value_name = "NAME=URL", action = ArgAction::Append, value_parser = parse_endpoint)]
    pub endpoints: Vec<Endpoint>,

    /// Write an HTML report with the table and a latency chart
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// SQL text to run, one outcome per argument
    #[arg(required = true, value_name = "SQL")]
    pub sql: Vec<String>,

    /// Query the empty table instead of loading from the API first
    #[arg(long)]
    pub skip_load: bool,

    /// Write the outcomes as an HTML page
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ConsoleArgs {
    /// Start with an empty table; use .load to fetch later
    #[arg(long)]
    pub skip_load: bool,
}

impl Command {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::Bench(_) => "bench",
            Command::Query(_) => "query",
            Command::Console(_) => "console",
        }
    }
}

impl Cli {
    /// Clap command with the environment variable reference appended to `--help`
    pub fn command_with_env_help() -> clap::Command {
        Self::command().after_help(EnvManager::display_env_help())
    }

    /// Parse process arguments, exiting with clap's usage error on failure
    pub fn parse_with_env_help() -> Self {
        let matches = Self::command_with_env_help().get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    /// Sample count given on the command line, if any
    pub fn sample_count(&self) -> Option<u32> {
        match &self.command {
            Command::Bench(args) => args.count,
            _ => None,
        }
    }

    /// Endpoints given on the command line
    pub fn endpoints(&self) -> &[Endpoint] {
        match &self.command {
            Command::Bench(args) => &args.endpoints,
            _ => &[],
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        !self.no_color && supports_color()
    }
}

/// Parse a timeout in whole seconds
fn parse_timeout(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid timeout: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid timeout: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Timeout must be greater than 0".to_string())
            } else if secs > crate::defaults::MAX_TIMEOUT_SECS {
                Err(format!(
                    "Timeout cannot exceed {} seconds",
                    crate::defaults::MAX_TIMEOUT_SECS
                ))
            } else {
                Ok(secs)
            }
        })
}

fn parse_endpoint(s: &str) -> Result<Endpoint, String> {
    s.parse::<Endpoint>().map_err(|e| e.to_string())
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    cfg!(unix)
}
