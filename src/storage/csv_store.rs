//! CSV dataset backend
//!
//! The dataset is a UTF-8 CSV file with a header row. Writes go to a sibling
//! temporary file which is then renamed over the target, so readers of the
//! path never see a half-written table.

use crate::catalog::CatalogItem;
use crate::storage::traits::{DatasetFileInfo, DatasetStore, StoreError, StoreResult};
use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Persisted column order
pub const COLUMNS: [&str; 11] = [
    "index",
    "title",
    "category",
    "image_url",
    "rating",
    "upc",
    "price",
    "tax",
    "stock",
    "reviews",
    "description",
];

/// Dataset stored as a single CSV file
#[derive(Debug, Clone)]
pub struct CsvDatasetStore {
    path: PathBuf,
}

impl CsvDatasetStore {
    /// Creates a store for the given file path; nothing is touched on disk
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn write_table(&self, target: &Path, items: &[Arc<CatalogItem>]) -> StoreResult<()> {
        let mut writer = csv::Writer::from_path(target).map_err(|e| self.csv_error(e))?;

        if items.is_empty() {
            writer
                .write_record(COLUMNS)
                .map_err(|e| self.csv_error(e))?;
        }

        for item in items {
            writer
                .serialize(item.as_ref())
                .map_err(|e| self.csv_error(e))?;
        }

        writer.flush().map_err(|e| self.io_error(e))
    }
}

impl DatasetStore for CsvDatasetStore {
    fn load(&self) -> StoreResult<Vec<CatalogItem>> {
        if !self.path.exists() {
            tracing::debug!("No dataset at {}", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| self.csv_error(e))?;
        let mut items = Vec::new();
        for record in reader.deserialize::<CatalogItem>() {
            items.push(record.map_err(|e| self.csv_error(e))?);
        }

        tracing::debug!("Loaded {} rows from {}", items.len(), self.path.display());
        Ok(items)
    }

    fn save(&self, items: &[Arc<CatalogItem>]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let temp = self.temp_path();
        if let Err(e) = self.write_table(&temp, items) {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }

        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            self.io_error(e)
        })?;

        tracing::info!("Saved {} rows to {}", items.len(), self.path.display());
        Ok(())
    }

    fn delete(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Deleted dataset {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn file_info(&self) -> Option<DatasetFileInfo> {
        let metadata = fs::metadata(&self.path).ok()?;
        let created_at = metadata
            .created()
            .or_else(|_| metadata.modified())
            .ok()
            .map(DateTime::<Local>::from);

        Some(DatasetFileInfo {
            size_bytes: metadata.len(),
            created_at,
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
