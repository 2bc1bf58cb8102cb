//! Component API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::{ListQuery, error_response};
use crate::domain::{Component, CreateComponentInput, UpdateComponentInput};
use crate::infrastructure::AppState;
use crate::services::component_service;

const NOT_FOUND: &str = "Component not found";

/// List active components
#[utoipa::path(
    get,
    path = "/api/v1/components",
    params(ListQuery),
    responses((status = 200, body = [Component])),
    tag = "components"
)]
pub async fn list_components(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    match component_service::list_components(state.component_repo.as_ref(), query.page()).await {
        Ok(components) => Json(components).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/components/{id}",
    params(("id" = i32, Path, description = "Component id")),
    responses(
        (status = 200, body = Component),
        (status = 404, description = "Component not found")
    ),
    tag = "components"
)]
pub async fn get_component(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match component_service::get_component(state.component_repo.as_ref(), id).await {
        Ok(component) => Json(component).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/components",
    request_body = CreateComponentInput,
    responses(
        (status = 201, body = Component),
        (status = 400, description = "Serial number already exists")
    ),
    tag = "components"
)]
pub async fn create_component(
    State(state): State<AppState>,
    Json(payload): Json<CreateComponentInput>,
) -> impl IntoResponse {
    match component_service::create_component(state.component_repo.as_ref(), payload).await {
        Ok(component) => (StatusCode::CREATED, Json(component)).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/components/{id}",
    params(("id" = i32, Path, description = "Component id")),
    request_body = UpdateComponentInput,
    responses(
        (status = 200, body = Component),
        (status = 400, description = "Serial number already exists"),
        (status = 404, description = "Component not found")
    ),
    tag = "components"
)]
pub async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateComponentInput>,
) -> impl IntoResponse {
    match component_service::update_component(state.component_repo.as_ref(), id, payload).await {
        Ok(component) => Json(component).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

/// Soft delete
#[utoipa::path(
    delete,
    path = "/api/v1/components/{id}",
    params(("id" = i32, Path, description = "Component id")),
    responses(
        (status = 204, description = "Component deactivated"),
        (status = 404, description = "Component not found")
    ),
    tag = "components"
)]
pub async fn delete_component(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match component_service::delete_component(state.component_repo.as_ref(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}
