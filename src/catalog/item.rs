use serde::{Deserialize, Serialize};

/// One book extracted from a detail page
///
/// Field order is the persisted column order:
/// `index,title,category,image_url,rating,upc,price,tax,stock,reviews,description`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Position in the table of the crawl that produced it
    pub index: usize,
    pub title: String,
    pub category: String,
    pub image_url: String,
    /// Star rating, 0 when the page carried no recognizable rating
    pub rating: u8,
    pub upc: String,
    /// Price excluding tax
    pub price: f64,
    pub tax: f64,
    pub stock: u32,
    pub reviews: u32,
    pub description: String,
}

impl CatalogItem {
    /// Creates an item with every field at its extraction default
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            title: String::new(),
            category: String::new(),
            image_url: String::new(),
            rating: 0,
            upc: String::new(),
            price: 0.0,
            tax: 0.0,
            stock: 0,
            reviews: 0,
            description: String::new(),
        }
    }
}
