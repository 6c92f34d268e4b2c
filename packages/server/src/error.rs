//! Server error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use store::ValidationError;

/// Error payload returned by the auth endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

/// Session Gate failure.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Either field did not match. Which one is only ever logged.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("auth backend error: {0}")]
    Backend(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid credentials",
            Self::Backend(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Backend(reason) = &self {
            tracing::error!(%reason, "auth request failed");
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Image Ingestion failure.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("upload failed: {0}")]
    Upload(String),
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::Upload(err.to_string())
    }
}
