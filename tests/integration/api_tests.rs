//! Route tests for the query API

use crate::support::{sample_items, test_config, three_page_catalog, wait_for_status};
use actix_web::{http::StatusCode, test, web, App};
use bookshelf::api::configure;
use bookshelf::storage::CsvDatasetStore;
use bookshelf::storage::DatasetStore;
use bookshelf::{CrawlStatus, ScraperService};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::MockServer;

/// Service over a finished three-book dataset
async fn done_service(server: &MockServer, dataset: &Path) -> web::Data<ScraperService> {
    CsvDatasetStore::new(dataset).save(&sample_items()).unwrap();
    let service = ScraperService::new(test_config(server, dataset)).unwrap();
    assert_eq!(service.load_existing(), CrawlStatus::Done);
    web::Data::new(service)
}

macro_rules! app {
    ($data:expr) => {
        test::init_service(App::new().app_data($data.clone()).configure(configure)).await
    };
}

macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let request = test::TestRequest::get().uri($uri).to_request();
        let response = test::call_service(&$app, request).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn test_status_and_queries_before_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let data = web::Data::new(
        ScraperService::new(test_config(&server, &dir.path().join("books.csv"))).unwrap(),
    );
    let app = app!(data);

    let (status, body) = get_json!(app, "/api/v1/scraper/status");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Idle");
    assert!(body["message"].as_str().unwrap().contains("/api/v1/scraper/start"));

    for uri in [
        "/api/v1/books",
        "/api/v1/books/search?title=python",
        "/api/v1/books/categories",
        "/api/v1/books/0",
    ] {
        let (status, body) = get_json!(app, uri);
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(body["message"].is_string(), "{}", uri);
    }
}

#[actix_web::test]
async fn test_queries_on_finished_dataset() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let data = done_service(&server, &dir.path().join("books.csv")).await;
    let app = app!(data);

    let (_, titles) = get_json!(app, "/api/v1/books");
    assert_eq!(
        titles,
        serde_json::json!(["Python Crash Course", "Learning Python", "Dune"])
    );

    let (_, found) = get_json!(app, "/api/v1/books/search?title=PYTHON");
    assert_eq!(found.as_array().unwrap().len(), 2);

    let (_, found) = get_json!(app, "/api/v1/books/search?title=python&category=science");
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "Python Crash Course");
    assert_eq!(found[0]["index"], 0);

    let (_, found) = get_json!(app, "/api/v1/books/search?title=&category=");
    assert_eq!(found.as_array().unwrap().len(), 3);

    let (_, categories) = get_json!(app, "/api/v1/books/categories");
    assert_eq!(
        categories,
        serde_json::json!({"categories": ["Programming", "Science", "Science Fiction"]})
    );
}

#[actix_web::test]
async fn test_book_lookup_by_position() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let data = done_service(&server, &dir.path().join("books.csv")).await;
    let app = app!(data);

    let (status, book) = get_json!(app, "/api/v1/books/2");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["title"], "Dune");
    assert_eq!(book["image_url"], "");

    let (status, body) = get_json!(app, "/api/v1/books/3");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["detail"],
        "Book not found. Index must be between 0 and 2. Total books available: 3"
    );

    let (status, _) = get_json!(app, "/api/v1/books/-1");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_control_routes_on_finished_dataset() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("books.csv");
    let data = done_service(&server, &dataset).await;
    let app = app!(data);

    let (_, body) = get_json!(app, "/api/v1/scraper/start");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Scraping completed successfully! 3 books"));

    let (_, stats) = get_json!(app, "/api/v1/scraper/stats");
    assert_eq!(stats["status"], "Done");
    assert_eq!(stats["total_books"], 3);
    assert_eq!(stats["books_in_table"], 3);
    assert_eq!(stats["database_file"], dataset.display().to_string());

    let (_, health) = get_json!(app, "/api/v1/health");
    assert_eq!(health["api_status"], "online");
    assert_eq!(health["books_scraped"], 3);
    assert!(health["csv_file_size_mb"].is_number());
    assert!(health["csv_creation_date"].is_string());

    let (status, body) = get_json!(app, "/api/v1/scraper/reset");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Scraping dataset deleted successfully.");
    assert!(!dataset.exists());

    let (_, health) = get_json!(app, "/api/v1/health");
    assert!(health["books_scraped"].is_null());
    assert!(health["csv_file_size_mb"].is_null());
}

#[actix_web::test]
async fn test_reset_during_crawl_then_lookup_is_not_ready() {
    let server = MockServer::start().await;
    three_page_catalog(&server, Duration::from_millis(300)).await;
    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("books.csv");
    CsvDatasetStore::new(&dataset).save(&sample_items()).unwrap();

    let data = web::Data::new(ScraperService::new(test_config(&server, &dataset)).unwrap());
    let app = app!(data);

    let (_, body) = get_json!(app, "/api/v1/scraper/start");
    assert_eq!(body["message"], "Scraping started in background.");
    wait_for_status(data.state(), CrawlStatus::ScrapingBooks).await;

    let (status, _) = get_json!(app, "/api/v1/scraper/reset");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data.status().status, CrawlStatus::Idle);
    assert!(!dataset.exists());

    let (status, body) = get_json!(app, "/api/v1/books/0");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Scraping has not started yet. Use /api/v1/scraper/start to start collecting data."
    );
    assert!(CsvDatasetStore::new(&dataset).file_info().is_none());
}

#[actix_web::test]
async fn test_stop_route_without_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let data = web::Data::new(
        ScraperService::new(test_config(&server, &dir.path().join("books.csv"))).unwrap(),
    );
    let app = app!(data);

    let (status, body) = get_json!(app, "/api/v1/scraper/stop");
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().starts_with("No crawl is running."));
}
