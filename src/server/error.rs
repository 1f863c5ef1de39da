//! Error responses for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::payload::ValidationError;

/// Every failure a route can produce. Rendered as a plain-text body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid id")]
    InvalidId,

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Invalid request body: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found")]
    NotFound,

    #[error("Internal server error")]
    Storage(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId | Self::InvalidBody | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Storage(ref err) = self {
            tracing::error!(error = %format!("{err:#}"), "storage failure");
        }
        (self.status(), self.to_string()).into_response()
    }
}
