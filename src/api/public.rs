//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

// Errors

pub enum ApiError {
    /// Unknown webhook or payload id
    NotFound(String),
    /// The caller sent something unusable, e.g. a non-JSON body
    BadRequest(String),
    /// Anything else, reported as a server error
    Internal(anyhow::Error),
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                // Always log the error
                tracing::error!("{}", err);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Something went wrong: {}", err),
                )
                    .into_response()
            }
        }
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

// Re-export public types from each route

pub mod push {
    pub use crate::api::routes::push::public::*;
}

pub mod stats {
    pub use crate::api::routes::stats::public::*;
}

pub mod webhooks {
    pub use crate::api::routes::webhooks::public::*;
}
