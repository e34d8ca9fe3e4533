//! API Lab - Main CLI Application
//!
//! Samples request latency against a public REST API and loads its paginated
//! listings into an in-memory SQLite table for ad-hoc queries.

use api_lab::{
    app::App,
    cli::Cli,
    error::{AppError, ErrorReporter, Result},
    PKG_NAME, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue with the command line you ran.");
        process::exit(1);
    }));

    let cli = Cli::parse_with_env_help();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    if let Err(e) = run_application(cli).await {
        reporter.report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!(
            "Built {} from commit {}",
            option_env!("BUILD_TIME").unwrap_or("unknown"),
            option_env!("GIT_COMMIT").unwrap_or("unknown")
        );
        eprintln!("Debug mode enabled");
        eprintln!();
    }

    App::new(cli).await?.run().await
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - Verify URL formats (must start with http:// or https://)");
            eprintln!("  - Endpoints are given as NAME=URL");
            eprintln!("  - Run with --help to list supported environment variables");
        }
        AppError::Network(_) | AppError::HttpRequest(_) | AppError::HttpStatus { .. } => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check your internet connection");
            eprintln!("  - Verify the API base URL with --base-url");
            eprintln!("  - Verify firewall or proxy settings");
        }
        AppError::Timeout(_) => {
            eprintln!();
            eprintln!("Timeout troubleshooting:");
            eprintln!("  - Increase timeout with --timeout option");
            eprintln!("  - Reduce sample count with --count option");
        }
        AppError::Query(_) => {
            eprintln!();
            eprintln!("Query help:");
            eprintln!("  - Rows live in the 'characters' table");
            eprintln!("  - Try 'api-lab console' and .examples for sample queries");
        }
        _ => {}
    }
}
