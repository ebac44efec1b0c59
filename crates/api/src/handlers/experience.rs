use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use bookit_core::{
    errors::BookitError,
    models::experience::{
        AddSlotsRequest, CreateExperienceRequest, DeleteExperienceResponse, Experience,
        ExperienceQuery, ExperienceSummary, UpdateExperienceRequest,
    },
};
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AdminAccess, error_handling::AppError},
};

fn experience_not_found() -> AppError {
    AppError(BookitError::NotFound("Experience not found".to_string()))
}

pub async fn list_experiences(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<ExperienceQuery>, QueryRejection>,
) -> Result<Json<Vec<ExperienceSummary>>, AppError> {
    let Query(query) = query?;
    let experiences = state.store.list_experiences(query.term()).await?;
    Ok(Json(experiences))
}

pub async fn get_experience(
    State(state): State<Arc<ApiState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Experience>, AppError> {
    let Path(id) = path?;
    let experience = state
        .store
        .get_experience(id)
        .await?
        .ok_or_else(experience_not_found)?;

    Ok(Json(experience))
}

pub async fn create_experience(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateExperienceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Experience>), AppError> {
    let Json(payload) = payload?;
    let new_experience = payload.validate()?;

    let created = state.store.create_experience(new_experience).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_experience(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateExperienceRequest>, JsonRejection>,
) -> Result<Json<Experience>, AppError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let update = payload.validate()?;

    let updated = state
        .store
        .update_experience(id, update)
        .await?
        .ok_or_else(experience_not_found)?;

    info!("Experience {} updated", id);
    Ok(Json(updated))
}

pub async fn delete_experience(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeleteExperienceResponse>, AppError> {
    let Path(id) = path?;
    if !state.store.delete_experience(id).await? {
        return Err(experience_not_found());
    }

    Ok(Json(DeleteExperienceResponse {
        message: "Experience deleted successfully".to_string(),
    }))
}

pub async fn add_slots(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<AddSlotsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Experience>), AppError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let slots = payload.validate()?;
    let added = slots.len();

    let experience = state.store.add_slots(id, slots).await?;

    info!("Added {} slots to experience {}", added, id);
    Ok((StatusCode::CREATED, Json(experience)))
}
