//! Main application orchestration and execution

use crate::{
    cli::{BenchArgs, Cli, Command, ConsoleArgs, QueryArgs},
    client::{ApiClient, HttpClient},
    config::{display_config_summary, load_config},
    console::{ConsoleCommand, CONSOLE_HELP, EXAMPLE_QUERIES},
    error::{AppError, Result},
    logging::{Logger, LoggerFactory},
    models::{Config, QueryOutcome},
    output::{html, ConsoleStatus, HtmlReport, OutputFormatter, OutputFormatterFactory, StatusSink},
    session::Session,
};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const PROMPT: &str = "api-lab> ";

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
    config: Config,
    formatter: Box<dyn OutputFormatter>,
    logger: Logger,
}

impl App {
    /// Load configuration for the parsed command line
    pub async fn new(cli: Cli) -> Result<Self> {
        let config = load_config(cli.clone())?;
        Ok(Self::with_config(cli, config).await)
    }

    /// Build the application around an already loaded configuration
    pub async fn with_config(cli: Cli, config: Config) -> Self {
        let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
        let logger = LoggerFactory::new(config.clone()).create_logger("APP").await;
        logger.add_context_field("command".to_string(), cli.command.name()).await;
        Self {
            cli,
            config,
            formatter,
            logger,
        }
    }

    /// Swap the output formatter
    pub fn with_formatter(mut self, formatter: Box<dyn OutputFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Run the selected subcommand against the real API, stdin and stdout
    pub async fn run(self) -> Result<()> {
        let client: Arc<dyn HttpClient> = Arc::new(ApiClient::from_config(&self.config)?);
        let status: Arc<dyn StatusSink> = Arc::new(ConsoleStatus::new(self.config.enable_color));
        let input = BufReader::new(tokio::io::stdin());
        let mut out = std::io::stdout();

        self.execute(client, status, input, &mut out).await
    }

    /// Run the selected subcommand with explicit collaborators
    pub async fn execute<R, W>(
        &self,
        client: Arc<dyn HttpClient>,
        status: Arc<dyn StatusSink>,
        input: R,
        out: &mut W,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        if self.config.debug {
            eprintln!("Configuration Summary:\n{}\n", display_config_summary(&self.config));
        }

        let mut session = Session::open(self.config.clone(), client, status)?;
        crate::log_debug!(self.logger, "Session opened for {}", self.cli.command.name());

        let result = match &self.cli.command {
            Command::Bench(args) => self.bench(&mut session, args, out).await,
            Command::Query(args) => self.query(&mut session, args, out).await,
            Command::Console(args) => self.console(&mut session, args, input, out).await,
        };

        session.close()?;
        result
    }

    async fn bench<W: Write>(&self, session: &mut Session, args: &BenchArgs, out: &mut W) -> Result<()> {
        let endpoints = self.config.benchmark_endpoints();
        crate::log_info!(
            self.logger,
            "Benchmarking {} endpoints with {} samples each",
            endpoints.len(),
            self.config.sample_count
        );

        let reports = session.run_benchmark().await?;

        writeln!(out, "{}", self.formatter.format_header("Latency Benchmark")?)?;
        writeln!(out, "{}", self.formatter.format_benchmark_table(&reports)?)?;

        let failures: usize = reports.iter().map(|report| report.failure_count()).sum();
        if failures > 0 {
            writeln!(
                out,
                "{}",
                self.formatter.format_warning(&format!(
                    "{} request cycle(s) failed and count as {} ms",
                    failures,
                    crate::defaults::FAILURE_SENTINEL_MS
                ))?
            )?;
        }

        if let Some(path) = &args.html {
            let mut report = HtmlReport::new("Latency Benchmark");
            report.add_section("Summary", html::render_benchmark_table(&reports));
            report.add_chart("Average latency", session.chart())?;
            self.write_report(&report, path, out)?;
        }

        Ok(())
    }

    async fn query<W: Write>(&self, session: &mut Session, args: &QueryArgs, out: &mut W) -> Result<()> {
        if !args.skip_load {
            self.load(session, out).await?;
        }

        let mut report = HtmlReport::new("Query Results");
        let mut failed = 0;

        for sql in &args.sql {
            let outcome = session.run_query(sql);
            if outcome.is_failure() {
                failed += 1;
            }
            writeln!(out, "{}", self.formatter.format_query_outcome(&outcome)?)?;
            report.add_section(sql.trim(), html::render_query_outcome(&outcome));
        }

        if let Some(path) = &args.html {
            self.write_report(&report, path, out)?;
        }

        if failed > 0 {
            return Err(AppError::query(format!(
                "{} of {} statements failed",
                failed,
                args.sql.len()
            )));
        }

        Ok(())
    }

    async fn console<R, W>(&self, session: &mut Session, args: &ConsoleArgs, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        if !args.skip_load {
            self.load(session, out).await?;
        }

        writeln!(out, "{} {} query console. Type .help for commands.", crate::PKG_NAME, crate::VERSION)?;

        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            match ConsoleCommand::parse(&line) {
                ConsoleCommand::Quit => break,
                ConsoleCommand::Help => writeln!(out, "{}", CONSOLE_HELP)?,
                ConsoleCommand::Examples => {
                    for (index, (title, sql)) in EXAMPLE_QUERIES.iter().enumerate() {
                        writeln!(out, "  {}. {}\n     {}", index + 1, title, sql)?;
                    }
                }
                ConsoleCommand::Example(number) => {
                    if let Some(sql) = crate::console::QueryConsole::example(number) {
                        writeln!(out, "{}", sql)?;
                        self.show_outcome(&session.run_query(sql), out)?;
                    }
                }
                ConsoleCommand::Load => {
                    // A failed reload is reported and the console keeps running
                    if let Err(e) = self.load(session, out).await {
                        writeln!(out, "{}", self.formatter.format_error(&e.to_string())?)?;
                    }
                }
                ConsoleCommand::Html(path) => match session.last_outcome() {
                    Some(outcome) => {
                        let mut report = HtmlReport::new("Query Results");
                        report.add_section("Last query", html::render_query_outcome(outcome));
                        if let Err(e) = self.write_report(&report, &path, out) {
                            writeln!(out, "{}", self.formatter.format_error(&e.to_string())?)?;
                        }
                    }
                    None => writeln!(out, "{}", self.formatter.format_warning("No query has been run yet.")?)?,
                },
                ConsoleCommand::Invalid(message) => writeln!(out, "{}", self.formatter.format_warning(&message)?)?,
                ConsoleCommand::Sql(text) => self.show_outcome(&session.run_query(&text), out)?,
            }
        }

        Ok(())
    }

    async fn load<W: Write>(&self, session: &mut Session, out: &mut W) -> Result<()> {
        let report = session.load_data().await?;
        crate::log_info!(self.logger, "{}", report);
        writeln!(out, "{}", self.formatter.format_load_report(&report)?)?;
        Ok(())
    }

    fn show_outcome<W: Write>(&self, outcome: &QueryOutcome, out: &mut W) -> Result<()> {
        writeln!(out, "{}", self.formatter.format_query_outcome(outcome)?)?;
        Ok(())
    }

    fn write_report<W: Write>(&self, report: &HtmlReport, path: &Path, out: &mut W) -> Result<()> {
        report.write_to(path)?;
        writeln!(
            out,
            "{}",
            self.formatter
                .format_success(&format!("HTML report written to {}", path.display()))?
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::JsonResponse;
    use crate::output::MemoryStatus;
    use async_trait::async_trait;
    use clap::Parser;
    use serde_json::json;

    /// Two-page listing; benchmark URLs answer with a tiny body
    struct FakeApi;

    #[async_trait]
    impl HttpClient for FakeApi {
        async fn get_json(&self, url: &str) -> Result<JsonResponse> {
            let body = if url.ends_with("character?page=1") {
                json!({
                    "info": {"next": "https://api.test/character?page=2"},
                    "results": [
                        {"id": 1, "name": "Rick Sanchez", "species": "Human", "image": "https://img.test/1.jpeg"},
                        {"id": 2, "name": "Morty Smith", "species": "Human", "image": "https://img.test/2.jpeg"}
                    ]
                })
            } else if url.ends_with("character?page=2") {
                json!({
                    "info": {"next": null},
                    "results": [{"id": 3, "name": "Summer Smith", "species": "Human"}]
                })
            } else {
                json!({"ok": true})
            };
            Ok(JsonResponse {
                status_code: 200,
                body,
                final_url: url.to_string(),
            })
        }
    }

    async fn app(args: &[&str]) -> App {
        let cli = Cli::parse_from(args);
        let config = Config {
            api_base_url: "https://api.test".to_string(),
            sample_count: 2,
            enable_color: false,
            ..Default::default()
        };
        App::with_config(cli, config)
            .await
            .with_formatter(OutputFormatterFactory::create_plain_formatter())
    }

    async fn execute(app: &App, stdin: &str) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = app
            .execute(Arc::new(FakeApi), Arc::new(MemoryStatus::new()), stdin.as_bytes(), &mut out)
            .await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_query_loads_then_runs_each_statement() {
        let app = app(&["api-lab", "query", "SELECT COUNT(*) AS n FROM characters", "DELETE FROM characters"]).await;
        let (result, out) = execute(&app, "").await;

        assert!(result.is_ok());
        assert!(out.contains("Loaded 3 rows from 2 pages"));
        assert!(out.contains("1 row in"));
        assert!(out.contains("(no results)"));
    }

    #[tokio::test]
    async fn test_query_failure_sets_error() {
        let app = app(&["api-lab", "query", "--skip-load", "SELECT 1", "SELEC nope"]).await;
        let (result, out) = execute(&app, "").await;

        let error = result.unwrap_err();
        assert_eq!(error.exit_code(), 6);
        assert!(error.to_string().contains("1 of 2 statements failed"));
        assert!(out.contains("ERROR: "));
    }

    #[tokio::test]
    async fn test_query_writes_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let path_arg = path.to_string_lossy().to_string();
        let app = app(&["api-lab", "query", "--html", path_arg.as_str(), "SELECT name, image FROM characters ORDER BY id"]).await;

        let (result, out) = execute(&app, "").await;
        assert!(result.is_ok());
        assert!(out.contains("HTML report written to"));

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<td>Rick Sanchez</td>"));
        assert!(html.contains("<img src=\"https://img.test/1.jpeg\""));
    }

    #[tokio::test]
    async fn test_bench_prints_table_and_chart_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.html");
        let path_arg = path.to_string_lossy().to_string();
        let app = app(&["api-lab", "bench", "--html", path_arg.as_str()]).await;

        let (result, out) = execute(&app, "").await;
        assert!(result.is_ok());
        assert!(out.contains("Latency Benchmark"));
        assert!(out.contains("Lambda"));
        assert!(out.contains("Kappa"));

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<canvas id=\"latency-chart\">"));
        assert!(html.contains("Median (ms)"));
    }

    #[tokio::test]
    async fn test_console_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.html");
        let stdin = format!(
            "\nSELECT name FROM characters WHERE id = 3\n.example 9\n.html {}\n.bogus\n.quit\nSELECT 'never'\n",
            path.display()
        );
        let app = app(&["api-lab", "console"]).await;

        let (result, out) = execute(&app, &stdin).await;
        assert!(result.is_ok());
        assert!(out.contains("Summer Smith"));
        assert!(out.contains("Please enter a SQL query."));
        assert!(out.contains("Usage: .example N"));
        assert!(out.contains("Unknown command '.bogus'"));
        assert!(!out.contains("never"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("Summer Smith"));
    }

    #[tokio::test]
    async fn test_console_ends_on_eof() {
        let app = app(&["api-lab", "console", "--skip-load"]).await;
        let (result, out) = execute(&app, ".html nowhere.html\n.examples\n").await;

        assert!(result.is_ok());
        assert!(out.contains("No query has been run yet."));
        assert!(out.contains("Count by species"));
    }
}
