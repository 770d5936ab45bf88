//! Scraper service
//!
//! `ScraperService` owns everything a running process shares between the
//! background crawl and the query API: the crawl state, the HTTP client, the
//! dataset store and the configuration. `main` constructs one instance and
//! hands it to the route layer.

mod health;

pub use health::HealthReport;

use crate::catalog::{query, CatalogItem, QueryError};
use crate::config::Config;
use crate::crawler::{build_http_client, CrawlOutcome, Orchestrator};
use crate::state::{CrawlState, CrawlStatus, Snapshot};
use crate::storage::{open_store, DatasetStore, StoreError};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Message returned when a crawl was started
pub const STARTED_MESSAGE: &str = "Scraping started in background.";

/// Current status with its message
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub status: CrawlStatus,
    pub message: String,
}

/// Crawl counters and dataset location
#[derive(Debug, Clone, Serialize)]
pub struct ScraperStats {
    pub status: CrawlStatus,
    /// Item URLs discovered by the current or last crawl
    pub total_books: usize,
    pub books_in_table: usize,
    pub database_file: String,
    pub base_url: String,
}

/// The crawler and its dataset, shared by the API handlers
pub struct ScraperService {
    config: Arc<Config>,
    state: Arc<CrawlState>,
    store: Arc<dyn DatasetStore>,
    orchestrator: Arc<Orchestrator>,
    started_at: Instant,
}

impl ScraperService {
    /// Creates a service persisting to the configured dataset path
    pub fn new(config: Config) -> crate::Result<Self> {
        let store = open_store(Path::new(&config.storage.dataset_path));
        Self::with_store(config, store)
    }

    /// Creates a service with an explicit dataset store
    pub fn with_store(config: Config, store: Arc<dyn DatasetStore>) -> crate::Result<Self> {
        let config = Arc::new(config);
        let client = build_http_client(&config.http)?;
        let state = Arc::new(CrawlState::new());
        let orchestrator = Orchestrator::new(
            client,
            Arc::clone(&config),
            Arc::clone(&state),
            Arc::clone(&store),
        )?;

        Ok(Self {
            config,
            state,
            store,
            orchestrator: Arc::new(orchestrator),
            started_at: Instant::now(),
        })
    }

    /// Shared crawl state
    pub fn state(&self) -> &Arc<CrawlState> {
        &self.state
    }

    /// Restores the last persisted dataset
    ///
    /// A non-empty dataset makes the service `Done`; a missing, empty or
    /// unreadable one leaves it `Idle`.
    pub fn load_existing(&self) -> CrawlStatus {
        match self.store.load() {
            Ok(items) => {
                if !items.is_empty() {
                    tracing::info!(
                        "Loaded {} books from {}",
                        items.len(),
                        self.store.location()
                    );
                }
                self.state.restore(items);
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable dataset: {}", e);
                self.state.restore(Vec::new());
            }
        }
        self.state.status()
    }

    /// Starts a background crawl if none is running
    ///
    /// Returns the start message, or the current status message when the
    /// current status does not allow a new crawl.
    pub fn start(&self) -> String {
        if !self.state.try_begin() {
            return self.state.message();
        }

        let orchestrator = Arc::clone(&self.orchestrator);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let job = tokio::spawn(async move { orchestrator.run().await });
            match job.await {
                Ok(outcome) => tracing::debug!("Crawl finished: {:?}", outcome),
                Err(e) => {
                    tracing::error!("Crawl task failed: {}", e);
                    state.clear();
                    state.set_status(CrawlStatus::Error);
                }
            }
        });

        tracing::info!("Crawl started in background");
        STARTED_MESSAGE.to_string()
    }

    /// Runs a crawl on the current task and waits for it
    ///
    /// Returns `None` if a crawl may not start from the current status.
    pub async fn run_crawl_now(&self) -> Option<CrawlOutcome> {
        if !self.state.try_begin() {
            return None;
        }
        Some(self.orchestrator.run().await)
    }

    /// Asks a running crawl to stop without waiting for it
    ///
    /// The persisted dataset is left untouched.
    pub fn stop(&self) -> String {
        if self.state.request_stop() {
            tracing::info!("Stop requested");
            "Stop requested. The crawl will stop before the next book.".to_string()
        } else {
            format!("No crawl is running. {}", self.state.message())
        }
    }

    /// Cancels any running crawl, then clears the table and the dataset file
    ///
    /// Waits, without a timeout, until the crawl job acknowledges the stop.
    /// The in-memory state is cleared and `Idle` even when deleting the file
    /// fails. A crawl started while the reset waits is stopped as well.
    pub async fn reset(&self) -> Result<(), StoreError> {
        loop {
            if self.state.request_stop() {
                tracing::info!("Reset waiting for the crawl to stop");
            }
            self.state.wait_while_stopping().await;

            let settled = self.state.exclusive(|| {
                if self.state.try_settle_idle() {
                    Some(self.store.delete())
                } else {
                    None
                }
            });
            if let Some(deleted) = settled {
                deleted?;
                break;
            }
        }

        tracing::info!("Dataset reset");
        Ok(())
    }

    /// Current status and message
    pub fn status(&self) -> StatusReport {
        let view = self.state.view();
        StatusReport {
            status: view.status,
            message: view.message(),
        }
    }

    pub fn stats(&self) -> ScraperStats {
        let view = self.state.view();
        ScraperStats {
            status: view.status,
            total_books: view.discovered,
            books_in_table: view.items.len(),
            database_file: self.store.location(),
            base_url: self.config.site.base_url.clone(),
        }
    }

    /// Titles of every book, in table order
    pub fn titles(&self) -> Result<Vec<String>, QueryError> {
        Ok(query::titles(&self.ready_items()?))
    }

    /// Books whose title and category contain the given filters
    pub fn search(
        &self,
        title: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Arc<CatalogItem>>, QueryError> {
        Ok(query::search(&self.ready_items()?, title, category))
    }

    /// Sorted unique categories
    pub fn categories(&self) -> Result<Vec<String>, QueryError> {
        Ok(query::categories(&self.ready_items()?))
    }

    /// Book at a 0-based table position
    pub fn book(&self, id: i64) -> Result<Arc<CatalogItem>, QueryError> {
        query::book_at(&self.ready_items()?, id)
    }

    /// Uptime, crawl status and dataset file details
    pub fn health(&self) -> HealthReport {
        HealthReport::collect(
            self.started_at.elapsed(),
            &self.state.view(),
            self.store.file_info(),
        )
    }

    /// Table snapshot, only once a crawl is complete
    fn ready_items(&self) -> Result<Snapshot, QueryError> {
        let view = self.state.view();
        if view.status == CrawlStatus::Done {
            Ok(view.items)
        } else {
            Err(QueryError::NotReady(view.message()))
        }
    }
}
