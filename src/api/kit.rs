//! Kit API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::{ListQuery, error_response};
use crate::domain::{CreateKitInput, DomainError, Kit, UpdateKitInput};
use crate::infrastructure::AppState;
use crate::services::kit_service;

const NOT_FOUND: &str = "Kit not found";
const NOT_A_MEMBER: &str = "Component is not part of this kit";

/// Body of `PUT /kits/{id}/components/{component_id}`
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetKitComponentRequest {
    pub quantity: i32,
}

/// List active kits with their components
#[utoipa::path(
    get,
    path = "/api/v1/kits",
    params(ListQuery),
    responses((status = 200, body = [Kit])),
    tag = "kits"
)]
pub async fn list_kits(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    match kit_service::list_kits(state.kit_repo.as_ref(), query.page()).await {
        Ok(kits) => Json(kits).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/kits/{id}",
    params(("id" = i32, Path, description = "Kit id")),
    responses(
        (status = 200, body = Kit),
        (status = 404, description = "Kit not found")
    ),
    tag = "kits"
)]
pub async fn get_kit(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match kit_service::get_kit(state.kit_repo.as_ref(), id).await {
        Ok(kit) => Json(kit).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/kits",
    request_body = CreateKitInput,
    responses(
        (status = 201, body = Kit),
        (status = 400, description = "Kit code already exists or invalid component list")
    ),
    tag = "kits"
)]
pub async fn create_kit(
    State(state): State<AppState>,
    Json(payload): Json<CreateKitInput>,
) -> impl IntoResponse {
    match kit_service::create_kit(
        state.kit_repo.as_ref(),
        state.component_repo.as_ref(),
        payload,
    )
    .await
    {
        Ok(kit) => (StatusCode::CREATED, Json(kit)).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/kits/{id}",
    params(("id" = i32, Path, description = "Kit id")),
    request_body = UpdateKitInput,
    responses(
        (status = 200, body = Kit),
        (status = 400, description = "Kit code already exists"),
        (status = 404, description = "Kit not found")
    ),
    tag = "kits"
)]
pub async fn update_kit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateKitInput>,
) -> impl IntoResponse {
    match kit_service::update_kit(state.kit_repo.as_ref(), id, payload).await {
        Ok(kit) => Json(kit).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

/// Soft delete
#[utoipa::path(
    delete,
    path = "/api/v1/kits/{id}",
    params(("id" = i32, Path, description = "Kit id")),
    responses(
        (status = 204, description = "Kit deactivated"),
        (status = 404, description = "Kit not found")
    ),
    tag = "kits"
)]
pub async fn delete_kit(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match kit_service::delete_kit(state.kit_repo.as_ref(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

/// Add a component to a kit or change its quantity
#[utoipa::path(
    put,
    path = "/api/v1/kits/{id}/components/{component_id}",
    params(
        ("id" = i32, Path, description = "Kit id"),
        ("component_id" = i32, Path, description = "Component id")
    ),
    request_body = SetKitComponentRequest,
    responses(
        (status = 200, body = Kit),
        (status = 400, description = "Unknown component or bad quantity"),
        (status = 404, description = "Kit not found")
    ),
    tag = "kits"
)]
pub async fn set_kit_component(
    State(state): State<AppState>,
    Path((id, component_id)): Path<(i32, i32)>,
    Json(payload): Json<SetKitComponentRequest>,
) -> impl IntoResponse {
    match kit_service::set_kit_component(
        state.kit_repo.as_ref(),
        state.component_repo.as_ref(),
        id,
        component_id,
        payload.quantity,
    )
    .await
    {
        Ok(kit) => Json(kit).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/kits/{id}/components/{component_id}",
    params(
        ("id" = i32, Path, description = "Kit id"),
        ("component_id" = i32, Path, description = "Component id")
    ),
    responses(
        (status = 200, body = Kit),
        (status = 404, description = "Kit not found, or component is not part of this kit")
    ),
    tag = "kits"
)]
pub async fn remove_kit_component(
    State(state): State<AppState>,
    Path((id, component_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    match kit_service::remove_kit_component(state.kit_repo.as_ref(), id, component_id).await {
        Ok(Some(kit)) => Json(kit).into_response(),
        Ok(None) => error_response(DomainError::NotFound, NOT_FOUND),
        Err(e) => error_response(e, NOT_A_MEMBER),
    }
}
