//! Bookshelf: a catalog crawler with a live query API
//!
//! This crate crawls a paginated book-catalog website, extracts one structured
//! record per book, and serves the accumulated dataset over HTTP while a single
//! crawl runs in the background.

pub mod api;
pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;
pub mod service;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Bookshelf operations
#[derive(Debug, Error)]
pub enum BookshelfError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Bookshelf operations
pub type Result<T> = std::result::Result<T, BookshelfError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::CatalogItem;
pub use config::Config;
pub use service::ScraperService;
pub use state::{CrawlState, CrawlStatus};
