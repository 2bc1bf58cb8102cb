use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "app": &*state.app_name,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner")
    )
)]
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": format!("{} is running", state.app_name),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
