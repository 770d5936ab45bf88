//! Storage module for persisting the collected dataset
//!
//! This module handles the on-disk cache of the last completed crawl:
//! - Loading the table at startup
//! - Overwriting it when a crawl completes
//! - Deleting it on reset
//! - Reporting file size and creation time for health checks

mod csv_store;
mod traits;

pub use csv_store::{CsvDatasetStore, COLUMNS};
pub use traits::{DatasetFileInfo, DatasetStore, StoreError, StoreResult};

use std::path::Path;
use std::sync::Arc;

/// Opens the dataset store at the given path
///
/// # Arguments
///
/// * `path` - Path to the CSV dataset file
///
/// # Returns
///
/// A shareable store handle; the file is not required to exist.
pub fn open_store(path: &Path) -> Arc<dyn DatasetStore> {
    Arc::new(CsvDatasetStore::new(path))
}
