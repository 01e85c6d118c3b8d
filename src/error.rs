//! HTTP-facing error type.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::llm::LlmError;

/// Errors returned by the API routes as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid or malformed request body (400).
    #[error("{0}")]
    BadRequest(String),

    /// Upstream LLM failure (502).
    #[error("LLM error: {0}")]
    Upstream(#[from] LlmError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Upstream(e) = &self {
            tracing::error!(error = %e, "LLM call failed");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
