use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use bookit_core::{
    errors::BookitError,
    models::booking::{Booking, CreateBookingRequest, CreateBookingResponse},
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AdminAccess, error_handling::AppError},
};

pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let Json(payload) = payload?;
    let new_booking = payload.validate()?;

    let experience_id = new_booking.experience_id;
    let booking = state.store.create_booking(new_booking).await.map_err(|err| {
        if matches!(err, BookitError::Conflict(_) | BookitError::Validation(_)) {
            warn!("Booking for experience {} rejected: {}", experience_id, err);
        }
        err
    })?;

    Ok((StatusCode::CREATED, Json(CreateBookingResponse::from(booking))))
}

pub async fn list_bookings(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.store.list_bookings().await?))
}

pub async fn get_booking(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Booking>, AppError> {
    let Path(id) = path?;
    let booking = state
        .store
        .get_booking(id)
        .await?
        .ok_or_else(|| BookitError::NotFound("Booking not found".to_string()))?;

    Ok(Json(booking))
}

pub async fn cancel_booking(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Booking>, AppError> {
    let Path(id) = path?;
    Ok(Json(state.store.cancel_booking(id).await?))
}
