//! # Admin Authentication
//!
//! Catalog management, booking administration and promo creation are guarded
//! by a shared bearer token (`ADMIN_API_KEY`). When no key is configured the
//! guard lets every request through.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use bookit_core::errors::BookitError;
use tracing::warn;

use crate::{ApiState, middleware::error_handling::AppError};

/// Extractor that rejects the request with 401 unless it carries the admin key.
///
/// ```ignore
/// async fn delete_experience(_admin: AdminAccess, ...) -> Result<..., AppError>
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Checks a request's `Authorization` header against the configured key.
pub fn verify_admin(expected: Option<&str>, header: Option<&str>) -> Result<(), BookitError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let header = header.ok_or_else(|| {
        BookitError::Authentication("Missing bearer token".to_string())
    })?;

    match bearer_token(header) {
        Some(token) if token == expected => Ok(()),
        _ => Err(BookitError::Authentication(
            "Invalid admin credentials".to_string(),
        )),
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        verify_admin(state.admin_api_key.as_deref(), header).map_err(|err| {
            warn!("Rejected admin request to {}: {}", parts.uri.path(), err);
            AppError(err)
        })?;

        Ok(AdminAccess)
    }
}
