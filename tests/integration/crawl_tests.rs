//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a synthetic catalog and run the full
//! crawl cycle end-to-end.

use crate::support::{
    listing_page, mount_html, sample_items, test_config, three_page_catalog, wait_for_status,
    CATALOG_TITLES,
};
use bookshelf::config::Config;
use bookshelf::crawler::{build_http_client, CrawlOutcome, PaginationWalker};
use bookshelf::storage::{CsvDatasetStore, DatasetStore, COLUMNS};
use bookshelf::{CrawlState, CrawlStatus, ScraperService};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::MockServer;

#[tokio::test]
async fn test_three_page_chain_collapses_duplicates() {
    let server = MockServer::start().await;
    three_page_catalog(&server, Duration::ZERO).await;

    let config = Config::default();
    let client = build_http_client(&config.http).unwrap();
    let walker = PaginationWalker::new(client, &config).unwrap();
    let state = CrawlState::new();

    let start = format!("{}/catalogue/category/books_1/index.html", server.uri());
    let links = walker.walk_all_items(&start, &state).await;

    // 2 + 2 + 1 links, one shared between pages A and B
    assert_eq!(links.len(), 4);
    assert_eq!(state.discovered(), 4);

    let urls: Vec<_> = links.urls().collect();
    assert_eq!(
        urls[0],
        format!("{}/catalogue/python-crash-course_1/index.html", server.uri())
    );
    assert_eq!(
        urls[3],
        format!("{}/catalogue/the-art-of-war_4/index.html", server.uri())
    );
    assert!(urls
        .iter()
        .all(|u| !u.ends_with("page-2.html") && !u.ends_with("travel_2/index.html")));
}

#[tokio::test]
async fn test_full_crawl_reaches_done_and_persists() {
    let server = MockServer::start().await;
    three_page_catalog(&server, Duration::ZERO).await;
    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("data").join("books.csv");

    let service = ScraperService::new(test_config(&server, &dataset)).unwrap();
    let outcome = service.run_crawl_now().await;

    assert_eq!(
        outcome,
        Some(CrawlOutcome::Completed {
            items: 4,
            persisted: true
        })
    );
    assert_eq!(service.status().status, CrawlStatus::Done);
    assert_eq!(service.titles().unwrap(), CATALOG_TITLES.to_vec());
    assert!(service
        .status()
        .message
        .starts_with("Scraping completed successfully! 4 books collected"));

    let dune = service.book(2).unwrap();
    assert_eq!(dune.category, "Science Fiction");
    assert_eq!(dune.price, 12.0);
    assert_eq!(dune.rating, 5);
    assert_eq!(dune.stock, 19);
    assert_eq!(dune.description, "About Dune.");
    assert_eq!(dune.image_url, format!("{}/media/cover.jpg", server.uri()));

    let war = service.book(3).unwrap();
    assert_eq!(war.price, 0.0);
    assert_eq!(war.rating, 0);

    // Header row in the fixed column order
    let content = std::fs::read_to_string(&dataset).unwrap();
    assert_eq!(content.lines().next().unwrap(), COLUMNS.join(","));

    // A fresh process restores the cached dataset
    let restarted = ScraperService::new(test_config(&server, &dataset)).unwrap();
    assert_eq!(restarted.load_existing(), CrawlStatus::Done);
    assert_eq!(restarted.titles().unwrap().len(), 4);
    assert_eq!(*restarted.book(2).unwrap(), *dune);
}

#[tokio::test]
async fn test_background_start_reports_progress() {
    let server = MockServer::start().await;
    three_page_catalog(&server, Duration::from_millis(100)).await;
    let dir = TempDir::new().unwrap();
    let service = ScraperService::new(test_config(&server, &dir.path().join("books.csv"))).unwrap();

    assert_eq!(service.start(), "Scraping started in background.");
    wait_for_status(service.state(), CrawlStatus::ScrapingBooks).await;

    let message = service.status().message;
    assert!(message.starts_with("Collecting book data: "), "{}", message);
    assert!(message.contains("/4 ("), "{}", message);

    // Start while running is a no-op returning the status message
    assert!(service.start().starts_with("Collecting book data: "));

    wait_for_status(service.state(), CrawlStatus::Done).await;
    assert_eq!(service.stats().books_in_table, 4);
}

#[tokio::test]
async fn test_reset_while_scraping_discards_everything() {
    let server = MockServer::start().await;
    three_page_catalog(&server, Duration::from_millis(300)).await;
    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("books.csv");

    // Cache left over from an earlier run
    CsvDatasetStore::new(&dataset).save(&sample_items()).unwrap();

    let service = ScraperService::new(test_config(&server, &dataset)).unwrap();
    service.start();
    wait_for_status(service.state(), CrawlStatus::ScrapingBooks).await;

    service.reset().await.unwrap();

    assert_eq!(service.status().status, CrawlStatus::Idle);
    assert!(service.state().items().is_empty());
    assert_eq!(service.state().discovered(), 0);
    assert!(!dataset.exists());

    // The crawl job does not come back to life
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(service.status().status, CrawlStatus::Idle);
    assert!(service.state().items().is_empty());
    assert!(!dataset.exists());
}

#[tokio::test]
async fn test_stop_cancels_without_touching_cache() {
    let server = MockServer::start().await;
    three_page_catalog(&server, Duration::from_millis(300)).await;
    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("books.csv");
    CsvDatasetStore::new(&dataset).save(&sample_items()).unwrap();

    let service = ScraperService::new(test_config(&server, &dataset)).unwrap();
    service.start();
    wait_for_status(service.state(), CrawlStatus::ScrapingBooks).await;

    assert!(service.stop().starts_with("Stop requested"));
    wait_for_status(service.state(), CrawlStatus::Idle).await;

    assert!(service.state().items().is_empty());
    let cached = CsvDatasetStore::new(&dataset).load().unwrap();
    assert_eq!(cached.len(), 3);
}

#[tokio::test]
async fn test_page_cap_bounds_cyclic_catalog() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/index.html",
        "<a href=\"loop.html\">Books</a>".to_string(),
    )
    .await;
    // Each listing page points back to itself
    mount_html(
        &server,
        "/loop.html",
        listing_page(&["book.html"], None, Some("loop.html")),
    )
    .await;
    mount_html(
        &server,
        "/book.html",
        crate::support::detail_page("Looped", "Travel", "£1.00", "One", 1),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(&server, &dir.path().join("books.csv"));
    config.crawl.max_pages = 5;

    let service = ScraperService::new(config).unwrap();
    let outcome = service.run_crawl_now().await;

    assert_eq!(
        outcome,
        Some(CrawlOutcome::Completed {
            items: 1,
            persisted: true
        })
    );
    let listing_requests = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/loop.html")
        .count();
    assert_eq!(listing_requests, 5);
}

#[tokio::test]
async fn test_site_without_books_ends_in_error_and_can_restart() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/index.html",
        "<a href=\"empty.html\">Books</a>".to_string(),
    )
    .await;
    mount_html(&server, "/empty.html", listing_page(&[], None, None)).await;

    let dir = TempDir::new().unwrap();
    let service =
        ScraperService::new(test_config(&server, &dir.path().join("books.csv"))).unwrap();

    assert_eq!(
        service.run_crawl_now().await,
        Some(CrawlOutcome::NoItemsDiscovered)
    );
    assert_eq!(service.status().status, CrawlStatus::Error);

    // Error is not sticky
    assert_eq!(
        service.run_crawl_now().await,
        Some(CrawlOutcome::NoItemsDiscovered)
    );
    let store: &dyn DatasetStore = &CsvDatasetStore::new(dir.path().join("books.csv"));
    assert!(store.file_info().is_none());
}
