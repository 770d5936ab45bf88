//! Listing-page walker
//!
//! Follows the chain of listing pages through their `next` links and gathers
//! every item link found along the way. The running count is written to the
//! shared state after each page so status queries see live progress.

use crate::config::Config;
use crate::crawler::extractor::extract_links;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::links::LinkMap;
use crate::state::CrawlState;
use crate::ConfigError;
use reqwest::Client;
use scraper::Selector;
use std::time::Duration;

/// Display text of the pagination links
const NEXT_LINK: &str = "next";
const PREVIOUS_LINK: &str = "previous";

/// Pages between progress log lines
const PAGE_LOG_INTERVAL: usize = 10;

/// Walks listing pages and collects item links
pub struct PaginationWalker {
    client: Client,
    scope: Option<Selector>,
    max_pages: usize,
    timeout: Duration,
}

impl PaginationWalker {
    /// Creates a walker from the site and crawl configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the listing scope is not a valid
    /// CSS selector.
    pub fn new(client: Client, config: &Config) -> Result<Self, ConfigError> {
        let scope = match config.site.listing_scope.trim() {
            "" => None,
            css => Some(Selector::parse(css).map_err(|e| {
                ConfigError::Validation(format!("Invalid listing scope '{}': {:?}", css, e))
            })?),
        };

        Ok(Self {
            client,
            scope,
            max_pages: config.crawl.max_pages,
            timeout: Duration::from_secs(config.http.timeout_secs),
        })
    }

    /// Finds the first listing page from the site's home page
    ///
    /// Returns the URL of the home-page link whose text equals `link_name`.
    /// An empty `link_name` means the home page is itself the first listing
    /// page. Returns `None` if the home page cannot be fetched or carries no
    /// such link.
    pub async fn locate_catalog(&self, base_url: &str, link_name: &str) -> Option<String> {
        if link_name.is_empty() {
            return Some(base_url.to_string());
        }

        let page = match fetch_page(&self.client, base_url, self.timeout).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch home page: {}", e);
                return None;
            }
        };

        let mut links = extract_links(&page.body, &page.url, None, true);
        let catalog = links.take_by_name(link_name);
        match &catalog {
            Some(url) => tracing::debug!("Catalog starts at {}", url),
            None => tracing::warn!("No '{}' link found on {}", link_name, page.url),
        }
        catalog
    }

    /// Collects item links from every listing page reachable from `start_url`
    ///
    /// # Walk Rules
    ///
    /// - Links with empty text are ignored
    /// - The `next` link is followed, the `previous` link is dropped
    /// - Links seen on several pages are kept once, at their first position
    /// - A page that fails to fetch ends the walk, since its `next` link is unknown
    /// - The walk stops early when cancellation is requested
    /// - At most `max_pages` pages are visited
    pub async fn walk_all_items(&self, start_url: &str, state: &CrawlState) -> LinkMap {
        let mut found = LinkMap::new();
        let mut next = Some(start_url.to_string());
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages >= self.max_pages {
                tracing::warn!(
                    "Reached the limit of {} listing pages; {} not visited",
                    self.max_pages,
                    url
                );
                break;
            }

            if state.is_stopping() {
                tracing::debug!("Walk cancelled after {} pages", pages);
                break;
            }

            pages += 1;
            match fetch_page(&self.client, &url, self.timeout).await {
                Ok(page) => {
                    let mut links =
                        extract_links(&page.body, &page.url, self.scope.as_ref(), true);
                    next = links.take_by_name(NEXT_LINK);
                    links.take_by_name(PREVIOUS_LINK);
                    tracing::debug!("Listing page {}: {} links", page.url, links.len());
                    found.merge(links);
                }
                Err(e) => tracing::warn!("Failed to fetch listing page: {}", e),
            }

            state.set_discovered(found.len());

            if pages % PAGE_LOG_INTERVAL == 0 {
                tracing::info!("Processed {} pages, {} books found", pages, found.len());
            }
        }

        tracing::info!(
            "Walk finished: {} pages processed, {} books found",
            pages,
            found.len()
        );
        found
    }
}
