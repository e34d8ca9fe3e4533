//! Paginated row loader
//!
//! Walks a `{info: {next}, results: [...]}` listing page by page, mapping
//! every result to a [`CharacterRow`] and committing each page in its own
//! transaction. A failed fetch stops the walk but keeps committed pages.

use crate::{
    client::HttpClient,
    db::Database,
    error::{AppError, Result},
    logging::{ErrorEventLogger, Logger},
    models::{ApiCharacter, ApiPage, CharacterRow, Config},
    output::StatusSink,
};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Outcome of one load cycle
#[derive(Debug)]
pub struct LoadReport {
    /// Pages fetched and committed
    pub pages: u32,
    /// Rows inserted across those pages
    pub rows: usize,
    /// Error that stopped the walk early, if any
    pub failure: Option<AppError>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => write!(f, "Loaded {} rows from {} pages", self.rows, self.pages),
            Some(error) => write!(f, "Load stopped after {} pages: {}", self.pages, error),
        }
    }
}

/// Fetches every page of the character listing into the database
pub struct RowLoader {
    client: Arc<dyn HttpClient>,
    logger: Logger,
    errors: ErrorEventLogger,
}

impl RowLoader {
    pub fn new(client: Arc<dyn HttpClient>, config: &Config) -> Self {
        Self {
            client,
            logger: Logger::with_config("LOAD".to_string(), config),
            errors: ErrorEventLogger::new(config),
        }
    }

    /// Clear the table, then follow `info.next` from `start_url` until it runs out
    ///
    /// Fetch and decode failures, and a `next` link that points back to a
    /// page already fetched, end up in [`LoadReport::failure`]. Only database
    /// errors are returned as `Err`, after the status line has been updated.
    pub async fn load_all(
        &self,
        start_url: &str,
        db: &mut Database,
        status: &dyn StatusSink,
    ) -> Result<LoadReport> {
        let correlation_id = self.logger.start_operation("load").await;
        db.clear_characters()?;

        let mut report = LoadReport {
            pages: 0,
            rows: 0,
            failure: None,
        };
        let mut next_url = Some(start_url.to_string());
        let mut visited = HashSet::new();

        while let Some(url) = next_url.take() {
            if !visited.insert(url.clone()) {
                let error = AppError::parse(format!("Pagination loops back to {}", url));
                self.errors
                    .log_error(&error, Some("Following info.next"), Some(&correlation_id))
                    .await;
                report.failure = Some(error);
                break;
            }

            status.set(&format!("Loading page {}...", report.pages + 1));

            let page = match self.fetch_page(&url).await {
                Ok(page) => page,
                Err(error) => {
                    self.errors
                        .log_error(&error, Some(&format!("Fetching {}", url)), Some(&correlation_id))
                        .await;
                    report.failure = Some(error);
                    break;
                }
            };

            let rows: Vec<CharacterRow> = page.results.into_iter().map(CharacterRow::from).collect();
            let inserted = match db.insert_characters(&rows) {
                Ok(inserted) => inserted,
                Err(error) => {
                    status.set(&format!("Load stopped after {} pages: {}", report.pages, error));
                    self.errors
                        .log_error(&error, Some(&format!("Inserting page from {}", url)), Some(&correlation_id))
                        .await;
                    self.logger.end_operation(&correlation_id, "load", false).await;
                    return Err(error);
                }
            };
            report.rows += inserted;
            report.pages += 1;

            self.logger
                .debug(&format!("Committed page {} ({} rows)", report.pages, rows.len()))
                .correlation_id(&correlation_id)
                .field("url", &url)
                .log()
                .await;

            next_url = page.info.next.filter(|next| !next.is_empty());
        }

        status.set(&report.to_string());
        self.logger
            .end_operation(&correlation_id, "load", report.is_complete())
            .await;

        Ok(report)
    }

    async fn fetch_page(&self, url: &str) -> Result<ApiPage<ApiCharacter>> {
        let response = self.client.get_json(url).await?;
        serde_json::from_value(response.body)
            .map_err(|e| AppError::parse(format!("Unexpected page shape from {}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::JsonResponse;
    use crate::db::QueryEngine;
    use crate::output::MemoryStatus;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves fixed bodies per URL and records every fetch
    struct PagedClient {
        pages: HashMap<String, Value>,
        fetched: Mutex<Vec<String>>,
    }

    impl PagedClient {
        fn new(pages: Vec<(&str, Value)>) -> Self {
            Self {
                pages: pages.into_iter().map(|(u, v)| (u.to_string(), v)).collect(),
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for PagedClient {
        async fn get_json(&self, url: &str) -> Result<JsonResponse> {
            self.fetched.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some(body) => Ok(JsonResponse {
                    status_code: 200,
                    body: body.clone(),
                    final_url: url.to_string(),
                }),
                None => Err(AppError::http_status(404, url)),
            }
        }
    }

    fn page(ids: &[i64], next: Option<&str>) -> Value {
        let results: Vec<Value> = ids
            .iter()
            .map(|id| {
                json!({
                    "id": id,
                    "name": format!("Character {}", id),
                    "status": "Alive",
                    "species": "Human",
                    "type": "",
                    "gender": "Female",
                    "origin": {"name": "Earth", "url": ""},
                    "location": {"name": "Citadel", "url": ""},
                    "image": format!("https://example.com/avatar/{}.jpeg", id),
                    "created": "2017-11-04T18:48:46.250Z"
                })
            })
            .collect();
        json!({"info": {"next": next}, "results": results})
    }

    #[tokio::test]
    async fn test_two_pages_fetched_exactly_once_each() {
        let client = Arc::new(PagedClient::new(vec![
            ("https://api.test/character?page=1", page(&[1, 2], Some("https://api.test/character?page=2"))),
            ("https://api.test/character?page=2", page(&[3], None)),
        ]));
        let loader = RowLoader::new(client.clone(), &Config::default());
        let mut db = Database::open_in_memory().unwrap();
        let status = MemoryStatus::new();

        let report = loader
            .load_all("https://api.test/character?page=1", &mut db, &status)
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.pages, 2);
        assert_eq!(report.rows, 3);
        assert_eq!(db.character_count().unwrap(), 3);
        assert_eq!(client.fetched().len(), 2);
        assert_eq!(
            status.history(),
            vec!["Loading page 1...", "Loading page 2...", "Loaded 3 rows from 2 pages"]
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_committed_pages() {
        let client = Arc::new(PagedClient::new(vec![(
            "https://api.test/character?page=1",
            page(&[1, 2], Some("https://api.test/character?page=2")),
        )]));
        let loader = RowLoader::new(client, &Config::default());
        let mut db = Database::open_in_memory().unwrap();
        let status = MemoryStatus::new();

        let report = loader
            .load_all("https://api.test/character?page=1", &mut db, &status)
            .await
            .unwrap();

        assert_eq!(report.pages, 1);
        assert_eq!(db.character_count().unwrap(), 2);
        assert!(matches!(report.failure, Some(AppError::HttpStatus { status: 404, .. })));
        assert!(status
            .current()
            .unwrap()
            .starts_with("Load stopped after 1 pages: HTTP status 404"));
    }

    #[tokio::test]
    async fn test_reload_does_not_accumulate() {
        let client = Arc::new(PagedClient::new(vec![(
            "https://api.test/character?page=1",
            page(&[1, 2, 3], None),
        )]));
        let loader = RowLoader::new(client, &Config::default());
        let mut db = Database::open_in_memory().unwrap();
        let status = MemoryStatus::new();

        loader.load_all("https://api.test/character?page=1", &mut db, &status).await.unwrap();
        let first = db.character_count().unwrap();
        loader.load_all("https://api.test/character?page=1", &mut db, &status).await.unwrap();

        assert_eq!(db.character_count().unwrap(), first);
    }

    #[tokio::test]
    async fn test_undecodable_page_stops_walk() {
        let client = Arc::new(PagedClient::new(vec![(
            "https://api.test/character?page=1",
            json!({"results": [{"name": "missing id"}]}),
        )]));
        let loader = RowLoader::new(client, &Config::default());
        let mut db = Database::open_in_memory().unwrap();

        let report = loader
            .load_all("https://api.test/character?page=1", &mut db, &MemoryStatus::new())
            .await
            .unwrap();

        assert_eq!(report.pages, 0);
        assert!(matches!(report.failure, Some(AppError::Parse(_))));
    }

    #[tokio::test]
    async fn test_cyclic_next_stops_walk() {
        let client = Arc::new(PagedClient::new(vec![
            ("https://api.test/character?page=1", page(&[1, 2], Some("https://api.test/character?page=2"))),
            ("https://api.test/character?page=2", page(&[3], Some("https://api.test/character?page=1"))),
        ]));
        let loader = RowLoader::new(client.clone(), &Config::default());
        let mut db = Database::open_in_memory().unwrap();
        let status = MemoryStatus::new();

        let report = loader
            .load_all("https://api.test/character?page=1", &mut db, &status)
            .await
            .unwrap();

        assert_eq!(client.fetched().len(), 2);
        assert_eq!(report.pages, 2);
        assert_eq!(db.character_count().unwrap(), 3);
        match &report.failure {
            Some(AppError::Parse(message)) => {
                assert!(message.contains("Pagination loops back to https://api.test/character?page=1"))
            }
            other => panic!("expected a pagination loop error, got {:?}", other),
        }
        assert!(status.current().unwrap().starts_with("Load stopped after 2 pages"));
    }

    #[tokio::test]
    async fn test_insert_failure_updates_status() {
        let client = Arc::new(PagedClient::new(vec![(
            "https://api.test/character?page=1",
            page(&[1, 2], None),
        )]));
        let loader = RowLoader::new(client, &Config::default());
        let mut db = Database::open_in_memory().unwrap();
        // An open transaction makes the per-page transaction fail to start
        db.exec("BEGIN;").unwrap();
        let status = MemoryStatus::new();

        let error = loader
            .load_all("https://api.test/character?page=1", &mut db, &status)
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::Database(_)));
        assert!(status.current().unwrap().starts_with("Load stopped after 0 pages"));
    }

    #[test]
    fn test_report_display() {
        let report = LoadReport {
            pages: 42,
            rows: 826,
            failure: None,
        };
        assert_eq!(report.to_string(), "Loaded 826 rows from 42 pages");
    }
}
