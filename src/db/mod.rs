//! In-memory SQLite store for loaded character rows
//!
//! [`Database`] owns the connection. Inserts run one transaction per page;
//! user query text goes through [`QueryEngine::exec`], which runs every
//! statement in order and keeps a result set only for statements that
//! returned at least one row.

use crate::error::{AppError, Result};
use crate::models::{CellValue, CharacterRow, ResultSet};
use rusqlite::types::ValueRef;
use rusqlite::{params, Batch, Connection};

const CREATE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS characters (
    id INTEGER PRIMARY KEY,
    name TEXT,
    status TEXT,
    species TEXT,
    subtype TEXT,
    gender TEXT,
    origin TEXT,
    location TEXT,
    image TEXT,
    created TEXT
)";

const INSERT_CHARACTER: &str = "INSERT OR REPLACE INTO characters (
    id, name, status, species, subtype, gender, origin, location, image, created
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

/// SQL engine seam used by the query console
pub trait QueryEngine {
    /// Execute one or more statements and collect the row-producing result sets
    fn exec(&mut self, sql: &str) -> Result<Vec<ResultSet>>;
}

/// Process-local database holding the `characters` table
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open an in-memory database and create the schema
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {}", e)))?;
        let db = Self { conn };
        db.create_schema()?;
        Ok(db)
    }

    /// Close the connection, surfacing any error SQLite reports
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| AppError::database(format!("Failed to close database: {}", e)))
    }

    pub fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(CREATE_SCHEMA)?;
        Ok(())
    }

    /// Remove every row so a fresh load starts empty
    pub fn clear_characters(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM characters", [])?)
    }

    /// Insert or replace a page of rows inside one transaction
    pub fn insert_characters(&mut self, rows: &[CharacterRow]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT_CHARACTER)?;
            for row in rows {
                stmt.execute(params![
                    row.id,
                    row.name,
                    row.status,
                    row.species,
                    row.subtype,
                    row.gender,
                    row.origin,
                    row.location,
                    row.image,
                    row.created,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    pub fn character_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM characters", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn exec_batch(&self, sql: &str) -> rusqlite::Result<Vec<ResultSet>> {
        let mut results = Vec::new();
        let mut batch = Batch::new(&self.conn, sql);

        while let Some(mut stmt) = batch.next()? {
            let column_count = stmt.column_count();
            if column_count == 0 {
                stmt.execute([])?;
                continue;
            }

            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let mut result = ResultSet::new(columns);

            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let mut cells = Vec::with_capacity(column_count);
                for index in 0..column_count {
                    cells.push(cell_value(row.get_ref(index)?));
                }
                result.rows.push(cells);
            }

            if result.row_count() > 0 {
                results.push(result);
            }
        }

        Ok(results)
    }
}

impl QueryEngine for Database {
    fn exec(&mut self, sql: &str) -> Result<Vec<ResultSet>> {
        self.exec_batch(sql).map_err(|e| AppError::query(e.to_string()))
    }
}

fn cell_value(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(i) => CellValue::Integer(i),
        ValueRef::Real(f) => CellValue::Real(f),
        ValueRef::Text(bytes) => CellValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => CellValue::Blob(bytes.to_vec()),
    }
}
