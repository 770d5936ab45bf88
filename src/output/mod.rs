//! Output module for reporting on collected datasets
//!
//! This module handles:
//! - Computing dataset statistics
//! - Printing them for the command-line modes

pub mod stats;

pub use stats::{compute_statistics, print_statistics, DatasetStatistics};

use crate::storage::DatasetStore;
use crate::Result;
use std::sync::Arc;

/// Loads the persisted dataset and computes its statistics
///
/// # Arguments
///
/// * `store` - The dataset backend to read
///
/// # Returns
///
/// * `Ok(DatasetStatistics)` - Statistics for the stored table (empty if nothing is stored)
/// * `Err(BookshelfError)` - The dataset could not be read
pub fn load_statistics(store: &dyn DatasetStore) -> Result<DatasetStatistics> {
    let items: Vec<_> = store.load()?.into_iter().map(Arc::new).collect();
    Ok(compute_statistics(&items))
}
