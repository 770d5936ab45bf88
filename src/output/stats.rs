//! Statistics over a collected dataset
//!
//! This module provides functionality for summarizing a table of books and
//! displaying the summary on stdout.

use crate::catalog::CatalogItem;
use std::collections::HashMap;
use std::sync::Arc;

/// Number of categories listed by `print_statistics`
const TOP_CATEGORIES: usize = 10;

/// Dataset statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStatistics {
    /// Total number of books
    pub total_books: usize,

    /// Number of distinct categories
    pub category_count: usize,

    /// Categories by descending book count, ties by name
    pub top_categories: Vec<(String, usize)>,

    /// Mean price excluding tax, 0.0 for an empty table
    pub average_price: f64,

    /// Sum of the stock of every book
    pub total_stock: u64,

    /// Number of books per star rating, index 0 is "unrated"
    pub rating_distribution: [usize; 6],
}

/// Computes statistics for a table
pub fn compute_statistics(items: &[Arc<CatalogItem>]) -> DatasetStatistics {
    let mut by_category: HashMap<&str, usize> = HashMap::new();
    let mut rating_distribution = [0usize; 6];
    let mut price_sum = 0.0;
    let mut total_stock = 0u64;

    for item in items {
        *by_category.entry(item.category.as_str()).or_default() += 1;
        rating_distribution[usize::from(item.rating.min(5))] += 1;
        price_sum += item.price;
        total_stock += u64::from(item.stock);
    }

    let mut top_categories: Vec<(String, usize)> = by_category
        .iter()
        .map(|(name, count)| (name.to_string(), *count))
        .collect();
    top_categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let average_price = if items.is_empty() {
        0.0
    } else {
        price_sum / items.len() as f64
    };

    DatasetStatistics {
        total_books: items.len(),
        category_count: by_category.len(),
        top_categories,
        average_price,
        total_stock,
        rating_distribution,
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &DatasetStatistics) {
    println!("=== Dataset Statistics ===\n");

    println!("Overview:");
    println!("  Total books: {}", stats.total_books);
    println!("  Categories: {}", stats.category_count);
    println!("  Average price: {:.2}", stats.average_price);
    println!("  Total stock: {}", stats.total_stock);
    println!();

    if !stats.top_categories.is_empty() {
        println!("Top Categories:");
        for (name, count) in stats.top_categories.iter().take(TOP_CATEGORIES) {
            let percentage = (*count as f64 / stats.total_books as f64) * 100.0;
            let name = if name.is_empty() { "(none)" } else { name };
            println!("  {}: {} ({:.1}%)", name, count, percentage);
        }
        println!();
    }

    println!("Ratings:");
    for (stars, count) in stats.rating_distribution.iter().enumerate().rev() {
        let label = if stars == 0 {
            "unrated".to_string()
        } else {
            format!("{} star{}", stars, if stars == 1 { "" } else { "s" })
        };
        println!("  {}: {}", label, count);
    }
}
