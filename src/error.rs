//! HTTP error mapping
//!
//! Handlers return [`ApiError`]; it renders as `{"error": "..."}` with a
//! matching status code.

use crate::catalog::CatalogError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    /// Catalog failure; `message` is what the client sees
    #[error("{message}")]
    Catalog {
        message: String,
        #[source]
        source: CatalogError,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Wraps a catalog failure with a client-facing message.
    pub fn catalog(message: impl Into<String>) -> impl FnOnce(CatalogError) -> Self {
        let message = message.into();
        move |source| Self::Catalog { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Catalog { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Catalog { message, source } = &self {
            tracing::error!(error = %source, "{}", message);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
