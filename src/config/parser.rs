//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};
use std::path::{Path, PathBuf};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(".env"),
        }
    }

    /// Read the .env layer from `path` instead of the working directory
    pub fn with_env_file(mut self, path: &Path) -> Self {
        self.env_file = path.to_path_buf();
        self
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file_from(&self.env_file, self.cli.debug)?;
        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref base_url) = self.cli.base_url {
            config.api_base_url = base_url.clone();
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = Some(timeout);
        }

        if let Some(count) = self.cli.sample_count() {
            config.sample_count = count;
        }

        let endpoints = self.cli.endpoints();
        if !endpoints.is_empty() {
            config.endpoints = endpoints.to_vec();
        }

        if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!(
                "Final config: sample_count={}, timeout={}, enable_color={}",
                config.sample_count,
                format_timeout(config.timeout_seconds),
                config.enable_color
            );
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let endpoints: Vec<String> = config
        .benchmark_endpoints()
        .iter()
        .map(|endpoint| endpoint.to_string())
        .collect();

    let summary = [
        format!("API Base URL: {}", config.api_base_url),
        format!("Endpoints: {}", endpoints.join(", ")),
        format!("Sample Count: {}", config.sample_count),
        format!("Timeout: {}", format_timeout(config.timeout_seconds)),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ];

    summary.join("\n")
}

fn format_timeout(timeout: Option<u64>) -> String {
    match timeout {
        Some(secs) => format!("{}s", secs),
        None => "client default".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::env;
    use std::sync::Mutex;

    // Tests in this module mutate process-wide environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "API_BASE_URL",
        "BENCH_ENDPOINTS",
        "SAMPLE_COUNT",
        "TIMEOUT_SECONDS",
        "ENABLE_COLOR",
    ];

    fn clear_vars() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn parse(args: &[&str], env_file: &Path) -> Result<Config> {
        let cli = Cli::parse_from(args);
        ConfigParser::new(cli).with_env_file(env_file).parse()
    }

    #[test]
    fn test_defaults_without_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_vars();
        let dir = tempfile::tempdir().unwrap();

        let config = parse(&["api-lab", "console"], &dir.path().join(".env")).unwrap();
        assert_eq!(config.api_base_url, crate::defaults::DEFAULT_API_BASE_URL);
        assert_eq!(config.sample_count, crate::defaults::DEFAULT_SAMPLE_COUNT);
        assert!(config.timeout_seconds.is_none());
        assert!(config.endpoints.is_empty());
    }

    #[test]
    fn test_env_file_layer() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_vars();
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        std::fs::write(
            &env_file,
            "SAMPLE_COUNT=7\nBENCH_ENDPOINTS=Lambda=http://127.0.0.1:1/a?page=1\n",
        )
        .unwrap();

        let config = parse(&["api-lab", "bench"], &env_file).unwrap();
        assert_eq!(config.sample_count, 7);
        assert_eq!(config.endpoints.len(), 1);
        assert_eq!(config.endpoints[0].url, "http://127.0.0.1:1/a?page=1");

        clear_vars();
    }

    #[test]
    fn test_cli_overrides_env_vars() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_vars();
        let dir = tempfile::tempdir().unwrap();

        env::set_var("SAMPLE_COUNT", "8");
        env::set_var("TIMEOUT_SECONDS", "30");
        env::set_var("API_BASE_URL", "https://env.example.com/api");

        let config = parse(
            &[
                "api-lab",
                "bench",
                "--count",
                "12",
                "--timeout",
                "5",
                "--endpoint",
                "only=https://cli.example.com/x",
                "--no-color",
            ],
            &dir.path().join(".env"),
        )
        .unwrap();

        assert_eq!(config.sample_count, 12);
        assert_eq!(config.timeout_seconds, Some(5));
        assert_eq!(config.api_base_url, "https://env.example.com/api");
        assert_eq!(config.endpoints[0].name, "only");
        assert!(!config.enable_color);

        clear_vars();
    }

    #[test]
    fn test_invalid_env_value_is_config_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_vars();
        let dir = tempfile::tempdir().unwrap();

        env::set_var("SAMPLE_COUNT", "lots");
        let error = parse(&["api-lab", "console"], &dir.path().join(".env")).unwrap_err();
        assert_eq!(error.category(), "CONFIG");

        env::set_var("SAMPLE_COUNT", "500");
        assert!(parse(&["api-lab", "console"], &dir.path().join(".env")).is_err());

        clear_vars();
    }

    #[test]
    fn test_invalid_cli_base_url() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_vars();
        let dir = tempfile::tempdir().unwrap();

        let result = parse(&["api-lab", "console", "--base-url", "nope"], &dir.path().join(".env"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_summary() {
        let summary = display_config_summary(&Config::default());

        assert!(summary.contains("API Base URL:"));
        assert!(summary.contains("Endpoints: Lambda ("));
        assert!(summary.contains("Sample Count: 5"));
        assert!(summary.contains("Timeout: client default"));
    }
}
