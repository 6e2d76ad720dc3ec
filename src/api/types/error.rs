//! HTML error responses

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::api::views::escape_html;
use crate::domain::DomainError;

/// Shown for every infrastructure failure; details stay in the logs
const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let reason = self.status.canonical_reason().unwrap_or("Error");
        let body = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{status} {reason}</title></head>\n\
             <body>\n<h1>{status} {reason}</h1>\n<p>{message}</p>\n<p><a href=\"/\">Home</a></p>\n</body>\n</html>\n",
            status = self.status.as_u16(),
            reason = reason,
            message = escape_html(&self.message),
        );

        (self.status, Html(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        error!(error = %err, "Request failed");
        Self::internal(GENERIC_FAILURE)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}
