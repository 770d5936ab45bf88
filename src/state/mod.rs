//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlStatus`: the phase of the background crawl and its status messages
//! - `CrawlState`: the shared status, discovered-URL counter and item table

mod crawl_state;
mod status;

// Re-export main types
pub use crawl_state::{CrawlState, Snapshot, StateView};
pub use status::{progress_percent, status_message, CrawlStatus};
