//! Crawler module for catalog page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a finite timeout
//! - HTML link and item extraction
//! - Listing-page walking
//! - Overall crawl orchestration

mod extractor;
mod fetcher;
mod links;
mod orchestrator;
mod paginator;

pub use extractor::{
    extract_links, parse_count, parse_price, parse_rating, parse_stock, ItemExtractor,
};
pub use fetcher::{build_http_client, fetch_page, FetchError, FetchedPage};
pub use links::LinkMap;
pub use orchestrator::{CrawlOutcome, Orchestrator};
pub use paginator::PaginationWalker;
