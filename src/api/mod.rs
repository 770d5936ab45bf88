//! HTTP query API
//!
//! Thin mapping from routes to `ScraperService` operations. The service is
//! shared with every worker through `web::Data`.

mod handlers;
mod responses;

pub use handlers::RESET_MESSAGE;
pub use responses::{ApiError, CategoriesResponse, ErrorDetail, MessageResponse};

use crate::service::ScraperService;
use actix_web::{web, App, HttpServer};

/// Registers every route
///
/// The fixed `/books/...` routes are registered before `/books/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::scraper_status)
        .service(handlers::scraper_start)
        .service(handlers::scraper_stop)
        .service(handlers::scraper_reset)
        .service(handlers::scraper_stats)
        .service(handlers::book_titles)
        .service(handlers::book_search)
        .service(handlers::book_categories)
        .service(handlers::book_by_id)
        .service(handlers::health);
}

/// Serves the API until the server is shut down
pub async fn serve(
    service: web::Data<ScraperService>,
    host: &str,
    port: u16,
) -> std::io::Result<()> {
    tracing::info!("Listening on {}:{}", host, port);
    HttpServer::new(move || App::new().app_data(service.clone()).configure(configure))
        .bind((host, port))?
        .run()
        .await
}
