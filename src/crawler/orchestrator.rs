//! Crawl orchestration
//!
//! The orchestrator drives one crawl attempt:
//!
//! ```text
//! ExtractingUrls ──(walk finds links)──► ScrapingBooks ──(all items)──► Done ──► persist
//!       │                                     │
//!       └──(nothing found)──► Error           └──(Stopping observed)──► Idle
//! ```
//!
//! The caller moves the state into `ExtractingUrls` before calling `run`.
//! Cancellation is polled between listing pages and before every item.

use crate::catalog::CatalogItem;
use crate::config::Config;
use crate::crawler::extractor::ItemExtractor;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::paginator::PaginationWalker;
use crate::state::{CrawlState, CrawlStatus};
use crate::storage::DatasetStore;
use crate::ConfigError;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a crawl attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Every discovered item was visited and the state is `Done`
    Completed { items: usize, persisted: bool },

    /// A stop was requested; the partial table was discarded
    Cancelled,

    /// The walk found no item links; the state is `Error`
    NoItemsDiscovered,

    /// Links were found but no item page could be fetched; the state is `Error`
    NoItemsCollected,
}

/// Runs crawl attempts against the shared state
pub struct Orchestrator {
    client: Client,
    config: Arc<Config>,
    state: Arc<CrawlState>,
    store: Arc<dyn DatasetStore>,
    walker: PaginationWalker,
    extractor: ItemExtractor,
}

impl Orchestrator {
    /// Creates an orchestrator
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configured selectors are invalid.
    pub fn new(
        client: Client,
        config: Arc<Config>,
        state: Arc<CrawlState>,
        store: Arc<dyn DatasetStore>,
    ) -> Result<Self, ConfigError> {
        let walker = PaginationWalker::new(client.clone(), &config)?;
        let extractor = ItemExtractor::new(&config.extractor)?;

        Ok(Self {
            client,
            config,
            state,
            store,
            walker,
            extractor,
        })
    }

    /// Runs one crawl attempt to completion or cancellation
    pub async fn run(&self) -> CrawlOutcome {
        let started = Instant::now();
        let site = &self.config.site;
        tracing::info!("Starting crawl of {}", site.base_url);

        let links = match self
            .walker
            .locate_catalog(&site.base_url, &site.catalog_link_name)
            .await
        {
            Some(start_url) => self.walker.walk_all_items(&start_url, &self.state).await,
            None => Default::default(),
        };

        if self.state.is_stopping() {
            return self.abandon();
        }

        if links.is_empty() {
            if !self.state.transition(CrawlStatus::ExtractingUrls, CrawlStatus::Error) {
                return self.abandon();
            }
            tracing::error!("No book URLs discovered; crawl failed");
            return CrawlOutcome::NoItemsDiscovered;
        }

        if !self.state.transition(CrawlStatus::ExtractingUrls, CrawlStatus::ScrapingBooks) {
            return self.abandon();
        }

        let total = links.len();
        tracing::info!("Collecting {} books", total);

        let timeout = Duration::from_secs(self.config.http.timeout_secs);
        let log_interval = self.config.crawl.progress_log_interval.max(1);
        let mut items: Vec<Arc<CatalogItem>> = Vec::with_capacity(total);

        for (position, url) in links.urls().enumerate() {
            if self.state.is_stopping() {
                return self.abandon();
            }

            match fetch_page(&self.client, url, timeout).await {
                Ok(page) => {
                    let item = self.extractor.extract(&page.body, &page.url, items.len());
                    tracing::debug!("Book {}: {}", item.index, item.title);
                    items.push(Arc::new(item));
                    self.state.publish(Arc::new(items.clone()));
                }
                Err(e) => tracing::warn!("Skipping book: {}", e),
            }

            if (position + 1) % log_interval == 0 {
                tracing::info!("Visited {}/{} book pages", position + 1, total);
            }
        }

        if items.is_empty() {
            if !self.state.transition(CrawlStatus::ScrapingBooks, CrawlStatus::Error) {
                return self.abandon();
            }
            tracing::error!("All {} book pages failed; crawl failed", total);
            return CrawlOutcome::NoItemsCollected;
        }

        let collected = items.len();
        self.state.set_discovered(collected);
        if !self.state.transition(CrawlStatus::ScrapingBooks, CrawlStatus::Done) {
            return self.abandon();
        }

        tracing::info!(
            "Crawl complete: {} books in {:.1}s",
            collected,
            started.elapsed().as_secs_f64()
        );

        let persisted = self.persist(&items);
        CrawlOutcome::Completed {
            items: collected,
            persisted,
        }
    }

    /// Writes the finished table unless a reset got there first
    fn persist(&self, items: &[Arc<CatalogItem>]) -> bool {
        self.state.exclusive(|| {
            if self.state.status() != CrawlStatus::Done {
                tracing::debug!("State changed before save; dataset not written");
                return false;
            }
            match self.store.save(items) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Failed to save dataset: {}", e);
                    false
                }
            }
        })
    }

    /// Acknowledges a stop request: drops the partial table and goes `Idle`
    fn abandon(&self) -> CrawlOutcome {
        tracing::info!("Crawl stopped");
        self.state.clear();
        self.state.transition(CrawlStatus::Stopping, CrawlStatus::Idle);
        CrawlOutcome::Cancelled
    }
}
