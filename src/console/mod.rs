//! Query console
//!
//! Forwards trimmed query text to the SQL engine and turns whatever comes
//! back into a [`QueryOutcome`]. Blank input never reaches the engine.

use crate::db::QueryEngine;
use crate::models::QueryOutcome;
use std::path::PathBuf;
use std::time::Instant;

/// Canned queries offered by `.examples` in the interactive console
pub const EXAMPLE_QUERIES: &[(&str, &str)] = &[
    ("All characters", "SELECT * FROM characters LIMIT 20;"),
    (
        "Alive humans",
        "SELECT id, name, image FROM characters WHERE status = 'Alive' AND species = 'Human';",
    ),
    (
        "Count by species",
        "SELECT species, COUNT(*) AS total FROM characters GROUP BY species ORDER BY total DESC;",
    ),
    (
        "Most common origins",
        "SELECT origin, COUNT(*) AS total FROM characters WHERE origin IS NOT NULL GROUP BY origin ORDER BY total DESC LIMIT 10;",
    ),
    (
        "Status by gender",
        "SELECT gender, status, COUNT(*) AS total FROM characters GROUP BY gender, status;",
    ),
];

/// Runs user-supplied SQL against an engine
pub struct QueryConsole;

impl QueryConsole {
    /// Execute `text` and describe the result
    pub fn run_query(engine: &mut dyn QueryEngine, text: &str) -> QueryOutcome {
        let sql = text.trim();
        if sql.is_empty() {
            return QueryOutcome::EmptyInput;
        }

        let start = Instant::now();
        match engine.exec(sql) {
            Ok(results) => {
                let elapsed = start.elapsed();
                match results.into_iter().next() {
                    Some(result) => QueryOutcome::Rows { result, elapsed },
                    None => QueryOutcome::Completed { elapsed },
                }
            }
            Err(error) => QueryOutcome::Failed {
                message: error.to_string(),
            },
        }
    }

    /// Canned query by 1-based position
    pub fn example(number: usize) -> Option<&'static str> {
        number
            .checked_sub(1)
            .and_then(|index| EXAMPLE_QUERIES.get(index))
            .map(|(_, sql)| *sql)
    }
}

/// One line of interactive console input
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// `.load`: clear the table and reload every page
    Load,
    /// `.examples`: list the canned queries
    Examples,
    /// `.example N`: run canned query N
    Example(usize),
    /// `.html PATH`: write the last outcome as an HTML page
    Html(PathBuf),
    Help,
    /// `.quit` or `.exit`
    Quit,
    /// Anything that is not a meta command, passed on as SQL
    Sql(String),
    /// A meta command with a missing or malformed argument
    Invalid(String),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('.') {
            return Self::Sql(line.to_string());
        }

        let (command, argument) = match trimmed.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (trimmed, ""),
        };

        match command {
            ".load" => Self::Load,
            ".examples" => Self::Examples,
            ".example" => match argument.parse::<usize>() {
                Ok(number) if QueryConsole::example(number).is_some() => Self::Example(number),
                _ => Self::Invalid(format!(
                    "Usage: .example N (1-{})",
                    EXAMPLE_QUERIES.len()
                )),
            },
            ".html" if !argument.is_empty() => Self::Html(PathBuf::from(argument)),
            ".html" => Self::Invalid("Usage: .html PATH".to_string()),
            ".help" => Self::Help,
            ".quit" | ".exit" => Self::Quit,
            other => Self::Invalid(format!("Unknown command '{}'. Type .help for help.", other)),
        }
    }
}

/// Text printed by `.help`
pub const CONSOLE_HELP: &str = "Enter SQL to run it against the characters table.
Each line runs as soon as it is entered, so keep a statement on one line.
Several statements may share a line when separated by ';'.

Meta commands:
  .load          Clear the table and reload every page from the API
  .examples      List the example queries
  .example N     Run example query N
  .html PATH     Write the last result as an HTML page
  .help          Show this help
  .quit, .exit   Leave the console";
