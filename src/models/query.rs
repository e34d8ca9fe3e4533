//! Query result sets and console outcomes

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A single cell returned by the SQL engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Real(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "{}", value),
            Self::Blob(bytes) => write!(f, "<blob {} bytes>", bytes.len()),
        }
    }
}

/// Columns and rows produced by one statement
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// What the query console produced for one piece of input
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Input was empty or whitespace; nothing was executed
    EmptyInput,
    /// Executed without producing rows
    Completed { elapsed: Duration },
    /// First result set returned by the engine
    Rows { result: ResultSet, elapsed: Duration },
    /// Engine rejected the statement or failed while running it
    Failed { message: String },
}

impl QueryOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            Self::Completed { elapsed } | Self::Rows { elapsed, .. } => Some(*elapsed),
            _ => None,
        }
    }
}
