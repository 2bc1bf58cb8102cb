pub mod component;
pub mod health;
pub mod kit;
pub mod loan;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{DomainError, Page};
use crate::infrastructure::AppState;

/// `/` and `/health`
pub fn root_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .with_state(state)
}

/// Resources mounted under `/api/v1`
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Components
        .route(
            "/components",
            get(component::list_components).post(component::create_component),
        )
        .route(
            "/components/:id",
            get(component::get_component)
                .put(component::update_component)
                .delete(component::delete_component),
        )
        // Kits
        .route("/kits", get(kit::list_kits).post(kit::create_kit))
        .route(
            "/kits/:id",
            get(kit::get_kit).put(kit::update_kit).delete(kit::delete_kit),
        )
        .route(
            "/kits/:id/components/:component_id",
            put(kit::set_kit_component).delete(kit::remove_kit_component),
        )
        // Loans
        .route("/loans", get(loan::list_loans).post(loan::create_loan))
        .route("/loans/active", get(loan::list_active_loans))
        .route("/loans/:id", get(loan::get_loan).put(loan::update_loan))
        .route("/loans/:id/return", put(loan::return_loan))
        .with_state(state)
}

/// `?skip=&limit=` window shared by the list endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Rows to skip (default 0)
    pub skip: Option<u64>,
    /// Maximum rows to return (default 100)
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

/// Map a domain failure to a status code and `{"error": ...}` body
pub(crate) fn error_response(err: DomainError, not_found: &str) -> Response {
    match err {
        DomainError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": not_found })),
        )
            .into_response(),
        DomainError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
        }
        e => {
            tracing::error!("Request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
