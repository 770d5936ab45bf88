//! Catalog records and the queries served over them

mod item;
pub mod query;

pub use item::CatalogItem;
pub use query::QueryError;
