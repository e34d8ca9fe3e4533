//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load a .env file if it exists; variables already set in the environment win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Supported environment variables with descriptions and examples
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("API_BASE_URL", "Base URL of the REST API", crate::defaults::DEFAULT_API_BASE_URL),
            (
                "BENCH_ENDPOINTS",
                "Comma-separated name=url benchmark endpoints",
                "Lambda=https://example.com/a,Kappa=https://example.com/b",
            ),
            ("SAMPLE_COUNT", "Request cycles per endpoint (1-100)", "5"),
            ("TIMEOUT_SECONDS", "Per-request timeout in seconds (1-300)", "10"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n", var, description));
            help.push_str(&format!("  {:<18} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_vars_match_config_layer() {
        let names: Vec<&str> = EnvManager::get_supported_env_vars()
            .into_iter()
            .map(|(name, _, _)| name)
            .collect();
        assert_eq!(
            names,
            vec!["API_BASE_URL", "BENCH_ENDPOINTS", "SAMPLE_COUNT", "TIMEOUT_SECONDS", "ENABLE_COLOR"]
        );
    }

    #[test]
    fn test_env_help() {
        let help = EnvManager::display_env_help();
        assert!(help.contains("API_BASE_URL"));
        assert!(help.contains("Configuration Priority"));
    }

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EnvManager::load_env_file_from(&dir.path().join(".env"), false).is_ok());
    }
}
