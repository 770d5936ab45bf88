use serde::Deserialize;

/// Main configuration structure for Bookshelf
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the defaults for the books.toscrape.com catalog shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Target catalog site
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Home page of the catalog
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Display text of the home-page link that opens the listing chain.
    /// Empty means the base URL is itself the first listing page.
    #[serde(rename = "catalog-link-name")]
    pub catalog_link_name: String,

    /// CSS selector delimiting the item area on listing pages
    #[serde(rename = "listing-scope")]
    pub listing_scope: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://books.toscrape.com/".to_string(),
            catalog_link_name: "Books".to_string(),
            listing_scope: "section".to_string(),
        }
    }
}

/// Detail page extraction settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Class of the `<ul>` holding the breadcrumb trail
    #[serde(rename = "breadcrumb-class")]
    pub breadcrumb_class: String,

    /// 1-based position of the category link inside the breadcrumb
    #[serde(rename = "category-link-number")]
    pub category_link_number: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            breadcrumb_class: "breadcrumb".to_string(),
            category_link_number: 3,
        }
    }
}

/// Crawl loop limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Maximum number of listing pages visited in one walk
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Number of items between progress log lines
    #[serde(rename = "progress-log-interval")]
    pub progress_log_interval: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 1000,
            progress_log_interval: 50,
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: format!("bookshelf/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Dataset persistence settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the CSV file caching the last completed crawl
    #[serde(rename = "dataset-path")]
    pub dataset_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dataset_path: "./data/scraping_books_database.csv".to_string(),
        }
    }
}

/// Query API listener
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
        }
    }
}
