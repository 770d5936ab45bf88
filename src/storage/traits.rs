//! Storage traits and error types
//!
//! This module defines the trait interface for dataset backends and
//! associated error types.

use crate::catalog::CatalogItem;
use chrono::{DateTime, Local};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during dataset persistence
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Size and creation time of the persisted dataset
#[derive(Debug, Clone)]
pub struct DatasetFileInfo {
    pub size_bytes: u64,
    /// Creation time, or modification time where the filesystem lacks it
    pub created_at: Option<DateTime<Local>>,
}

/// Trait for dataset backends
///
/// The whole table is read and written at once; there is no row-level
/// update.
pub trait DatasetStore: Send + Sync {
    /// Loads the persisted table; a missing dataset loads as empty
    fn load(&self) -> StoreResult<Vec<CatalogItem>>;

    /// Replaces the persisted table
    fn save(&self, items: &[Arc<CatalogItem>]) -> StoreResult<()>;

    /// Removes the persisted table; succeeds when it does not exist
    fn delete(&self) -> StoreResult<()>;

    /// File information, None when nothing is persisted
    fn file_info(&self) -> Option<DatasetFileInfo>;

    /// Human-readable location of the dataset
    fn location(&self) -> String;
}
