//! Read-only queries over a table snapshot

use crate::catalog::CatalogItem;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by dataset queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The dataset is not complete yet; carries the current status message
    #[error("{0}")]
    NotReady(String),

    #[error(
        "Book not found. Index must be between 0 and {}. Total books available: {total}",
        .total.saturating_sub(1)
    )]
    OutOfRange { id: i64, total: usize },
}

/// Titles in table order
pub fn titles(items: &[Arc<CatalogItem>]) -> Vec<String> {
    items.iter().map(|item| item.title.clone()).collect()
}

/// Filters items by title and category
///
/// Both filters are case-insensitive substring matches and are AND-combined.
/// A missing or empty filter matches everything.
pub fn search(
    items: &[Arc<CatalogItem>],
    title: Option<&str>,
    category: Option<&str>,
) -> Vec<Arc<CatalogItem>> {
    let title = normalize_filter(title);
    let category = normalize_filter(category);

    items
        .iter()
        .filter(|item| matches_filter(&item.title, title.as_deref()))
        .filter(|item| matches_filter(&item.category, category.as_deref()))
        .cloned()
        .collect()
}

/// Sorted, de-duplicated category names
pub fn categories(items: &[Arc<CatalogItem>]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Looks up an item by its 0-based position in the table
pub fn book_at(items: &[Arc<CatalogItem>], id: i64) -> Result<Arc<CatalogItem>, QueryError> {
    usize::try_from(id)
        .ok()
        .and_then(|position| items.get(position))
        .cloned()
        .ok_or(QueryError::OutOfRange {
            id,
            total: items.len(),
        })
}

fn normalize_filter(filter: Option<&str>) -> Option<String> {
    filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase)
}

fn matches_filter(value: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(needle) => value.to_lowercase().contains(needle),
        None => true,
    }
}
