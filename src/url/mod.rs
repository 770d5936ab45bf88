//! URL handling module for Bookshelf
//!
//! Catalog pages link to each other with document-relative hrefs that can
//! climb several directory levels (`../../media/...`). This module turns them
//! into absolute URLs without ever failing a crawl on a malformed href.

mod resolve;

pub use resolve::{resolve_link, split_parent_segments};
