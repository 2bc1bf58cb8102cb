//! Loan API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::error_response;
use crate::domain::{CreateLoanInput, Loan, LoanFilter, LoanStatus, Page, UpdateLoanInput};
use crate::infrastructure::AppState;
use crate::services::loan_service;

const NOT_FOUND: &str = "Loan not found";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLoansQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    /// `active` or `returned`
    pub status: Option<LoanStatus>,
}

#[utoipa::path(
    get,
    path = "/api/v1/loans",
    params(ListLoansQuery),
    responses((status = 200, body = [Loan])),
    tag = "loans"
)]
pub async fn list_loans(
    State(state): State<AppState>,
    Query(query): Query<ListLoansQuery>,
) -> impl IntoResponse {
    let filter = LoanFilter {
        status: query.status,
        page: Page::new(query.skip, query.limit),
    };

    match loan_service::list_loans(state.loan_repo.as_ref(), filter).await {
        Ok(loans) => Json(loans).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

/// Loans that have not been returned yet
#[utoipa::path(
    get,
    path = "/api/v1/loans/active",
    responses((status = 200, body = [Loan])),
    tag = "loans"
)]
pub async fn list_active_loans(State(state): State<AppState>) -> impl IntoResponse {
    match loan_service::list_active_loans(state.loan_repo.as_ref()).await {
        Ok(loans) => Json(loans).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/loans/{id}",
    params(("id" = i32, Path, description = "Loan id")),
    responses(
        (status = 200, body = Loan),
        (status = 404, description = "Loan not found")
    ),
    tag = "loans"
)]
pub async fn get_loan(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match loan_service::get_loan(state.loan_repo.as_ref(), id).await {
        Ok(loan) => Json(loan).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/loans",
    request_body = CreateLoanInput,
    responses(
        (status = 201, body = Loan),
        (status = 400, description = "Item missing or not available, or invalid request")
    ),
    tag = "loans"
)]
pub async fn create_loan(
    State(state): State<AppState>,
    Json(payload): Json<CreateLoanInput>,
) -> impl IntoResponse {
    match loan_service::create_loan(state.loan_repo.as_ref(), payload).await {
        Ok(loan) => (StatusCode::CREATED, Json(loan)).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/loans/{id}/return",
    params(("id" = i32, Path, description = "Loan id")),
    responses(
        (status = 200, body = Loan),
        (status = 400, description = "Loan is already returned"),
        (status = 404, description = "Loan not found")
    ),
    tag = "loans"
)]
pub async fn return_loan(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match loan_service::return_loan(state.loan_repo.as_ref(), id).await {
        Ok(loan) => Json(loan).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}

/// Patch borrower details, due date or notes. Status is not accepted here.
#[utoipa::path(
    put,
    path = "/api/v1/loans/{id}",
    params(("id" = i32, Path, description = "Loan id")),
    request_body = UpdateLoanInput,
    responses(
        (status = 200, body = Loan),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "Loan not found")
    ),
    tag = "loans"
)]
pub async fn update_loan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateLoanInput>,
) -> impl IntoResponse {
    match loan_service::update_loan(state.loan_repo.as_ref(), id, payload).await {
        Ok(loan) => Json(loan).into_response(),
        Err(e) => error_response(e, NOT_FOUND),
    }
}
