//! Response bodies and error mapping for the query API

use crate::catalog::QueryError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// `{message}` body used by control endpoints and not-ready queries
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{categories: [...]}` body
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// `{detail}` body for 404 responses
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Query failures as HTTP responses
///
/// A query against an incomplete dataset is not a client error: it answers
/// 200 with the status message.
#[derive(Debug)]
pub struct ApiError(pub QueryError);

impl From<QueryError> for ApiError {
    fn from(error: QueryError) -> Self {
        Self(error)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            QueryError::NotReady(_) => StatusCode::OK,
            QueryError::OutOfRange { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match &self.0 {
            QueryError::NotReady(message) => {
                HttpResponse::Ok().json(MessageResponse::new(message.clone()))
            }
            QueryError::OutOfRange { .. } => HttpResponse::NotFound().json(ErrorDetail {
                detail: self.0.to_string(),
            }),
        }
    }
}
