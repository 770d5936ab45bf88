//! Configuration module for Bookshelf
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All sections are optional; `Config::default()` targets books.toscrape.com.
//!
//! # Example
//!
//! ```no_run
//! use bookshelf::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("bookshelf.toml")).unwrap();
//! println!("Walking at most {} listing pages", config.crawl.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, ExtractorConfig, HttpConfig, ServerConfig, SiteConfig, StorageConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
