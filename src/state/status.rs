/// Crawl status definitions and the user-facing status messages
use serde::Serialize;
use std::fmt;

/// Represents the current phase of the background crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CrawlStatus {
    /// No crawl has run since startup or the last reset
    Idle,

    /// Walking listing pages to collect item URLs
    ExtractingUrls,

    /// Fetching and extracting detail pages
    ScrapingBooks,

    /// Crawl finished; the table is complete
    Done,

    /// Cancellation requested; the crawl job has not acknowledged it yet
    Stopping,

    /// The last crawl attempt found nothing to collect
    Error,
}

impl CrawlStatus {
    /// Returns true while a crawl job owns the state
    pub fn is_active(&self) -> bool {
        matches!(self, Self::ExtractingUrls | Self::ScrapingBooks)
    }

    /// Returns true if a new crawl may be started from this status
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Error)
    }

    /// Stable lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ExtractingUrls => "extracting_urls",
            Self::ScrapingBooks => "scraping_books",
            Self::Done => "done",
            Self::Stopping => "stopping",
            Self::Error => "error",
        }
    }

    /// Returns all possible statuses
    pub fn all_statuses() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::ExtractingUrls,
            Self::ScrapingBooks,
            Self::Done,
            Self::Stopping,
            Self::Error,
        ]
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Percentage of discovered items already collected, clamped to 100
pub fn progress_percent(collected: usize, discovered: usize) -> f64 {
    if discovered == 0 {
        return 0.0;
    }
    ((collected as f64 / discovered as f64) * 100.0).min(100.0)
}

/// Builds the status message shown by every read endpoint
///
/// Pure function of the status and the two counters.
pub fn status_message(status: CrawlStatus, collected: usize, discovered: usize) -> String {
    match status {
        CrawlStatus::ExtractingUrls => format!(
            "Scraping in progress: extracting book URLs from the site. Please wait... ({} URLs found so far)",
            discovered
        ),
        CrawlStatus::ScrapingBooks if discovered > 0 => format!(
            "Collecting book data: {}/{} ({:.1}%). Wait for completion to access the query functions.",
            collected,
            discovered,
            progress_percent(collected, discovered)
        ),
        CrawlStatus::ScrapingBooks => "Starting book data collection. Please wait...".to_string(),
        CrawlStatus::Done => format!(
            "Scraping completed successfully! {} books collected and available for queries.",
            discovered
        ),
        CrawlStatus::Stopping => "Stopping the scraping...".to_string(),
        CrawlStatus::Error => {
            "Error during scraping. Use /api/v1/scraper/reset to reset and try again.".to_string()
        }
        CrawlStatus::Idle => {
            "Scraping has not started yet. Use /api/v1/scraper/start to start collecting data."
                .to_string()
        }
    }
}
