use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::store::CounterError;

/// Failures surfaced over HTTP. The body only ever carries a generic message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Never produced by `CounterStore::read`, which falls back to 0.
    #[error("Failed to get count")]
    GetCount,

    #[error("Failed to increment count")]
    IncrementCount(#[source] CounterError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorBody { error: &message })
    }
}
