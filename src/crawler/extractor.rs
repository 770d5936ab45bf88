//! HTML extraction for listing and detail pages
//!
//! This module handles parsing fetched pages to extract:
//! - Links with their visible text (listing and home pages)
//! - The structured fields of a single book (detail pages)
//!
//! Every field is extracted independently; a missing element only leaves
//! that field at its default.

use crate::catalog::CatalogItem;
use crate::config::ExtractorConfig;
use crate::crawler::links::LinkMap;
use crate::url::resolve_link;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Product table keys read from detail pages
const UPC_KEY: &str = "UPC";
const PRICE_KEY: &str = "Price (excl. tax)";
const TAX_KEY: &str = "Tax";
const AVAILABILITY_KEY: &str = "Availability";
const REVIEWS_KEY: &str = "Number of reviews";

fn selector(css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css)
        .map_err(|e| ConfigError::Validation(format!("Invalid selector '{}': {:?}", css, e)))
}

/// Trimmed visible text of an element, text nodes joined by single spaces
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts every hyperlink from a page
///
/// # Arguments
///
/// * `html` - Page body
/// * `page_url` - Absolute URL of the page, used to resolve relative hrefs
/// * `scope` - When set, only links inside the first element matching it are
///   returned; a page without such an element yields no links
/// * `skip_unnamed` - Drop links whose visible text is empty
///
/// # Returns
///
/// Absolute URL to trimmed link text, in document order. Anchors without an
/// `href` or with an empty one are ignored.
pub fn extract_links(
    html: &str,
    page_url: &str,
    scope: Option<&Selector>,
    skip_unnamed: bool,
) -> LinkMap {
    let document = Html::parse_document(html);
    let mut links = LinkMap::new();

    let root = match scope {
        Some(scope) => match document.select(scope).next() {
            Some(element) => element,
            None => {
                tracing::debug!("No listing scope found on {}", page_url);
                return links;
            }
        },
        None => document.root_element(),
    };

    let Ok(anchor) = Selector::parse("a") else {
        return links;
    };

    for element in root.select(&anchor) {
        let Some(href) = element.value().attr("href").filter(|h| !h.is_empty()) else {
            continue;
        };

        let name = element_text(element);
        if skip_unnamed && name.is_empty() {
            continue;
        }

        links.insert(resolve_link(page_url, Some(href)), name);
    }

    links
}

/// Precompiled selectors for detail pages
#[derive(Debug)]
struct ItemSelectors {
    title: Selector,
    breadcrumb_links: Selector,
    image: Selector,
    rating: Selector,
    table_rows: Selector,
    th: Selector,
    td: Selector,
    description_anchor: Selector,
}

/// Extracts `CatalogItem`s from detail pages
#[derive(Debug)]
pub struct ItemExtractor {
    selectors: ItemSelectors,
    category_link_number: usize,
}

impl ItemExtractor {
    /// Builds an extractor for the configured breadcrumb shape
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the breadcrumb class does not form
    /// a valid selector.
    pub fn new(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors: ItemSelectors {
                title: selector(&format!("ul.{} li.active", config.breadcrumb_class))?,
                breadcrumb_links: selector(&format!("ul.{} a", config.breadcrumb_class))?,
                image: selector("div.item.active img")?,
                rating: selector("p.star-rating")?,
                table_rows: selector("table.table tr")?,
                th: selector("th")?,
                td: selector("td")?,
                description_anchor: selector("#product_description")?,
            },
            category_link_number: config.category_link_number,
        })
    }

    /// Extracts one item from a detail page
    ///
    /// # Arguments
    ///
    /// * `html` - Detail page body
    /// * `page_url` - Absolute URL of the page, used to resolve the image URL
    /// * `index` - Position the item will take in the table
    pub fn extract(&self, html: &str, page_url: &str, index: usize) -> CatalogItem {
        let document = Html::parse_document(html);
        let mut item = CatalogItem::empty(index);

        item.title = self.extract_title(&document);
        item.category = self.extract_category(&document);
        item.image_url = self.extract_image_url(&document, page_url);
        item.rating = self.extract_rating(&document);

        let table = self.extract_product_table(&document);
        if table.is_empty() {
            tracing::debug!("No product table on {}", page_url);
        }
        if let Some(upc) = table.get(UPC_KEY) {
            item.upc = upc.clone();
        }
        item.price = table.get(PRICE_KEY).map_or(0.0, |v| parse_price(v));
        item.tax = table.get(TAX_KEY).map_or(0.0, |v| parse_price(v));
        item.stock = table.get(AVAILABILITY_KEY).map_or(0, |v| parse_stock(v));
        item.reviews = table.get(REVIEWS_KEY).map_or(0, |v| parse_count(v));

        item.description = self.extract_description(&document);

        if item.title.is_empty() {
            tracing::debug!("No title found on {}", page_url);
        }
        item
    }

    fn extract_title(&self, document: &Html) -> String {
        document
            .select(&self.selectors.title)
            .next()
            .map(element_text)
            .unwrap_or_default()
    }

    fn extract_category(&self, document: &Html) -> String {
        if self.category_link_number == 0 {
            return String::new();
        }
        document
            .select(&self.selectors.breadcrumb_links)
            .nth(self.category_link_number - 1)
            .map(element_text)
            .unwrap_or_default()
    }

    fn extract_image_url(&self, document: &Html, page_url: &str) -> String {
        document
            .select(&self.selectors.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .filter(|src| !src.trim().is_empty())
            .map(|src| resolve_link(page_url, Some(src)))
            .unwrap_or_default()
    }

    fn extract_rating(&self, document: &Html) -> u8 {
        document
            .select(&self.selectors.rating)
            .next()
            .and_then(|p| p.value().classes().map(parse_rating).find(|&r| r > 0))
            .unwrap_or(0)
    }

    fn extract_product_table(&self, document: &Html) -> HashMap<String, String> {
        let mut table = HashMap::new();
        for row in document.select(&self.selectors.table_rows) {
            let key = row.select(&self.selectors.th).next().map(element_text);
            let value = row.select(&self.selectors.td).next().map(element_text);
            if let (Some(key), Some(value)) = (key, value) {
                table.insert(key, value);
            }
        }
        table
    }

    /// First paragraph after the description anchor, in document order
    fn extract_description(&self, document: &Html) -> String {
        let Some(anchor) = document.select(&self.selectors.description_anchor).next() else {
            return String::new();
        };

        let anchor_id = (*anchor).id();
        document
            .root_element()
            .descendants()
            .skip_while(|node| node.id() != anchor_id)
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == "p")
            .map(element_text)
            .unwrap_or_default()
    }
}

/// Maps a textual rating token to stars
///
/// ```
/// use bookshelf::crawler::parse_rating;
///
/// assert_eq!(parse_rating("Three"), 3);
/// assert_eq!(parse_rating("Zero"), 0);
/// ```
pub fn parse_rating(token: &str) -> u8 {
    match token {
        "One" => 1,
        "Two" => 2,
        "Three" => 3,
        "Four" => 4,
        "Five" => 5,
        _ => 0,
    }
}

/// Parses a price such as `£51.77`, defaulting to 0.0
///
/// Negative amounts also fall back to 0.0.
pub fn parse_price(text: &str) -> f64 {
    let digits = text
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && !matches!(c, '.' | '-' | '+'));
    match digits.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Parses availability text such as `In stock (22 available)`, defaulting to 0
pub fn parse_stock(text: &str) -> u32 {
    let text = text.trim();
    if let Ok(count) = text.parse() {
        return count;
    }

    let exact = text
        .strip_prefix("In stock (")
        .and_then(|rest| rest.strip_suffix(" available)"))
        .and_then(|count| count.trim().parse().ok());
    if let Some(count) = exact {
        return count;
    }

    text.split_once('(')
        .map(|(_, rest)| {
            rest.chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(char::is_ascii_digit)
                .collect::<String>()
        })
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

/// Parses a plain non-negative integer, defaulting to 0
pub fn parse_count(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}
