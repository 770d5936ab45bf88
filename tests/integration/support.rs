//! Synthetic catalog sites and helpers shared by the integration tests

use bookshelf::config::Config;
use bookshelf::{CatalogItem, CrawlState, CrawlStatus};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Books served by `three_page_catalog`, in discovery order
pub const CATALOG_TITLES: [&str; 4] = [
    "Python Crash Course",
    "Learning Python",
    "Dune",
    "The Art of War",
];

/// Listing page with the given item hrefs and pagination links
pub fn listing_page(items: &[&str], previous: Option<&str>, next: Option<&str>) -> String {
    let mut html = String::from(
        "<html><body><aside><a href=\"../books/travel_2/index.html\">Travel</a></aside><section><ol>",
    );
    for href in items {
        html.push_str(&format!(
            "<li><a href=\"{href}\"><img src=\"thumb.jpg\"></a><h3><a href=\"{href}\">{href}</a></h3></li>"
        ));
    }
    html.push_str("</ol><ul class=\"pager\">");
    if let Some(previous) = previous {
        html.push_str(&format!("<li class=\"previous\"><a href=\"{previous}\">previous</a></li>"));
    }
    if let Some(next) = next {
        html.push_str(&format!("<li class=\"next\"><a href=\"{next}\">next</a></li>"));
    }
    html.push_str("</ul></section></body></html>");
    html
}

/// Detail page in the catalog's product layout
pub fn detail_page(title: &str, category: &str, price: &str, rating: &str, stock: u32) -> String {
    format!(
        r#"<html><body>
        <ul class="breadcrumb">
            <li><a href="../../index.html">Home</a></li>
            <li><a href="../category/books_1/index.html">Books</a></li>
            <li><a href="../category/books/x/index.html">{category}</a></li>
            <li class="active">{title}</li>
        </ul>
        <div class="item active"><img src="../../media/cover.jpg" alt="{title}"></div>
        <p class="star-rating {rating}"></p>
        <div id="product_description" class="sub-header"><h2>Product Description</h2></div>
        <p>About {title}.</p>
        <table class="table table-striped">
            <tr><th>UPC</th><td>upc-{stock}</td></tr>
            <tr><th>Price (excl. tax)</th><td>{price}</td></tr>
            <tr><th>Tax</th><td>£0.00</td></tr>
            <tr><th>Availability</th><td>In stock ({stock} available)</td></tr>
            <tr><th>Number of reviews</th><td>0</td></tr>
        </table>
        </body></html>"#
    )
}

pub async fn mount_html(server: &MockServer, at: &str, body: String) {
    mount_delayed(server, at, body, Duration::ZERO).await;
}

pub async fn mount_delayed(server: &MockServer, at: &str, body: String, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Mounts a home page and a three-page listing chain A -> B -> C
///
/// Page B repeats one book from page A, so the chain holds four unique books.
/// Every detail page answers after `item_delay`.
pub async fn three_page_catalog(server: &MockServer, item_delay: Duration) {
    mount_html(
        server,
        "/index.html",
        "<html><body><ul class=\"nav\"><li><a href=\"catalogue/category/books_1/index.html\">Books</a></li></ul>\
         <a href=\"index.html\"></a></body></html>"
            .to_string(),
    )
    .await;

    mount_html(
        server,
        "/catalogue/category/books_1/index.html",
        listing_page(
            &["../../python-crash-course_1/index.html", "../../learning-python_2/index.html"],
            None,
            Some("page-2.html"),
        ),
    )
    .await;
    mount_html(
        server,
        "/catalogue/category/books_1/page-2.html",
        listing_page(
            &["../../learning-python_2/index.html", "../../dune_3/index.html"],
            Some("index.html"),
            Some("page-3.html"),
        ),
    )
    .await;
    mount_html(
        server,
        "/catalogue/category/books_1/page-3.html",
        listing_page(&["../../the-art-of-war_4/index.html"], Some("page-2.html"), None),
    )
    .await;

    let books = [
        ("python-crash-course_1", "Science", "£39.99", "Five", 4),
        ("learning-python_2", "Programming", "£44.50", "Four", 1),
        ("dune_3", "Science Fiction", "£12.00", "Five", 19),
        ("the-art-of-war_4", "Philosophy", "N/A", "Bogus", 7),
    ];
    for (title, (slug, category, price, rating, stock)) in CATALOG_TITLES.iter().zip(books) {
        let at = format!("/catalogue/{}/index.html", slug);
        let page = detail_page(title, category, price, rating, stock);
        mount_delayed(server, &at, page, item_delay).await;
    }
}

/// Configuration pointing at a mock site and a dataset path
pub fn test_config(server: &MockServer, dataset: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = format!("{}/index.html", server.uri());
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config.storage.dataset_path = dataset.display().to_string();
    config
}

/// A small finished table
pub fn sample_items() -> Vec<Arc<CatalogItem>> {
    [
        ("Python Crash Course", "Science", 39.99),
        ("Learning Python", "Programming", 44.5),
        ("Dune", "Science Fiction", 12.0),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (title, category, price))| {
        let mut item = CatalogItem::empty(index);
        item.title = title.to_string();
        item.category = category.to_string();
        item.price = price;
        item.rating = 4;
        item.stock = 3;
        Arc::new(item)
    })
    .collect()
}

/// Waits until the state reaches `status`
pub async fn wait_for_status(state: &CrawlState, status: CrawlStatus) {
    let mut rx = state.subscribe();
    tokio::time::timeout(Duration::from_secs(15), rx.wait_for(|s| *s == status))
        .await
        .unwrap_or_else(|_| {
            panic!("timed out waiting for {:?}, still {:?}", status, state.status())
        })
        .expect("status channel closed");
}
