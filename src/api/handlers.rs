use crate::api::responses::{ApiError, CategoriesResponse, MessageResponse};
use crate::service::ScraperService;
use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;

/// Message returned after a successful reset
pub const RESET_MESSAGE: &str = "Scraping dataset deleted successfully.";

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    title: Option<String>,
    category: Option<String>,
}

#[get("/api/v1/scraper/status")]
pub async fn scraper_status(service: web::Data<ScraperService>) -> impl Responder {
    HttpResponse::Ok().json(service.status())
}

#[get("/api/v1/scraper/start")]
pub async fn scraper_start(service: web::Data<ScraperService>) -> impl Responder {
    HttpResponse::Ok().json(MessageResponse::new(service.start()))
}

#[get("/api/v1/scraper/stop")]
pub async fn scraper_stop(service: web::Data<ScraperService>) -> impl Responder {
    HttpResponse::Ok().json(MessageResponse::new(service.stop()))
}

#[get("/api/v1/scraper/reset")]
pub async fn scraper_reset(service: web::Data<ScraperService>) -> impl Responder {
    match service.reset().await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new(RESET_MESSAGE)),
        Err(e) => {
            tracing::error!("Reset could not delete the dataset: {}", e);
            HttpResponse::InternalServerError().json(MessageResponse::new(format!(
                "Crawl state cleared, but the dataset file could not be deleted: {}",
                e
            )))
        }
    }
}

#[get("/api/v1/scraper/stats")]
pub async fn scraper_stats(service: web::Data<ScraperService>) -> impl Responder {
    HttpResponse::Ok().json(service.stats())
}

#[get("/api/v1/books")]
pub async fn book_titles(service: web::Data<ScraperService>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(service.titles()?))
}

#[get("/api/v1/books/search")]
pub async fn book_search(
    service: web::Data<ScraperService>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let books = service.search(params.title.as_deref(), params.category.as_deref())?;
    Ok(HttpResponse::Ok().json(books))
}

#[get("/api/v1/books/categories")]
pub async fn book_categories(
    service: web::Data<ScraperService>,
) -> Result<HttpResponse, ApiError> {
    let categories = service.categories()?;
    Ok(HttpResponse::Ok().json(CategoriesResponse { categories }))
}

#[get("/api/v1/books/{id}")]
pub async fn book_by_id(
    service: web::Data<ScraperService>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(service.book(id.into_inner())?))
}

#[get("/api/v1/health")]
pub async fn health(service: web::Data<ScraperService>) -> impl Responder {
    HttpResponse::Ok().json(service.health())
}
