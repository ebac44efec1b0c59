//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and `{ "error": "<message>" }`
//! bodies so every endpoint fails the same way.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bookit_core::errors::BookitError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use bookit_api::middleware::error_handling::AppError;
/// use bookit_core::errors::BookitError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(BookitError::NotFound("Experience not found".to_string()).into());
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookitError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            BookitError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            BookitError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            BookitError::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
            BookitError::Authentication(message) => (StatusCode::UNAUTHORIZED, message.clone()),
            BookitError::Database(_) | BookitError::Internal(_) => {
                // Details stay in the log.
                error!("Request failed: {:?}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Allows `?` on `BookitResult` inside handlers.
impl From<BookitError> for AppError {
    fn from(err: BookitError) -> Self {
        AppError(err)
    }
}

/// Wraps a bare report as a database error.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookitError::Database(err))
    }
}

/// Malformed or mistyped JSON bodies are reported as validation errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(BookitError::Validation(rejection.body_text()))
    }
}

/// Malformed path parameters, such as an id that is not a UUID.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(BookitError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(BookitError::Validation(rejection.body_text()))
    }
}

/// Gives the empty 408 produced by the request timeout the usual
/// `{ "error": ... }` body.
pub async fn timeout_error_body(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    (
        StatusCode::REQUEST_TIMEOUT,
        Json(json!({ "error": "Request timed out" })),
    )
        .into_response()
}

/// Maps a BookitError straight to an HTTP response
pub fn map_error(err: BookitError) -> Response {
    AppError(err).into_response()
}
