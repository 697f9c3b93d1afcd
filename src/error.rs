//! Error kinds surfaced at the request boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Failures a request handler can end with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad or missing client input; the message is returned verbatim.
    #[error("{0}")]
    Validation(String),
    /// The completion service failed for at least one row.
    #[error("narrative generation failed: {0:#}")]
    Generation(anyhow::Error),
    /// Anything else, e.g. transient file I/O.
    #[error("internal failure: {0:#}")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Convert into a response, replacing any 5xx detail with `public_message`.
    pub fn into_response_with(self, public_message: &'static str) -> Response {
        match self {
            Self::Validation(message) => error_body(StatusCode::BAD_REQUEST, message),
            other => {
                error!(error = %other, "request failed");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, public_message.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.into())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_body(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}
