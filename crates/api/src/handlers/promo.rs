use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use bookit_core::{
    errors::BookitError,
    models::promo::{CreatePromoRequest, Promo, ValidatePromoRequest, ValidatePromoResponse},
};
use tracing::debug;

use crate::{
    ApiState,
    middleware::{auth::AdminAccess, error_handling::AppError},
};

pub async fn list_promos(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Promo>>, AppError> {
    Ok(Json(state.store.list_promos().await?))
}

pub async fn create_promo(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreatePromoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Promo>), AppError> {
    let Json(payload) = payload?;
    let new_promo = payload.validate()?;

    let created = state.store.create_promo(new_promo).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Reports whether a code is usable; an unknown code is a normal answer,
/// not an error.
pub async fn validate_promo(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<ValidatePromoRequest>, JsonRejection>,
) -> Result<Json<ValidatePromoResponse>, AppError> {
    let Json(payload) = payload?;
    let code = payload
        .code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| BookitError::Validation("Promo code is required".to_string()))?;

    let promo = state.store.find_active_promo(code.to_string()).await?;
    debug!("Promo lookup for {}: {}", code, promo.is_some());

    Ok(Json(ValidatePromoResponse::from_lookup(promo)))
}
