//! Loan workflow endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppResult, models::instance::BookInstance};

use super::AuthenticatedUser;

/// Check-out request
#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CheckOutRequest {
    /// Borrowing user ID
    pub user_id: i32,
    /// Date the copy is due back
    pub due_back: NaiveDate,
}

/// Check a copy out to a user
#[utoipa::path(
    post,
    path = "/instances/{id}/checkout",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Instance ID")
    ),
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Copy checked out", body = BookInstance),
        (status = 404, description = "Instance or user not found"),
        (status = 409, description = "Copy is not available")
    )
)]
pub async fn check_out(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CheckOutRequest>,
) -> AppResult<Json<BookInstance>> {
    claims.require_write_loans()?;

    let instance = state
        .services
        .loans
        .check_out(id, request.user_id, request.due_back)
        .await?;
    Ok(Json(instance))
}

/// Return a copy to the shelf
#[utoipa::path(
    post,
    path = "/instances/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Instance ID")
    ),
    responses(
        (status = 200, description = "Copy returned", body = BookInstance),
        (status = 404, description = "Instance not found"),
        (status = 409, description = "Copy is not on loan")
    )
)]
pub async fn check_in(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstance>> {
    claims.require_write_loans()?;

    let instance = state.services.loans.check_in(id).await?;
    Ok(Json(instance))
}

/// List the authenticated user's borrowed copies, soonest due first
#[utoipa::path(
    get,
    path = "/loans/my",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Copies on loan to the caller", body = Vec<BookInstance>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookInstance>>> {
    let loans = state.services.loans.my_loans(claims.user_id).await?;
    Ok(Json(loans))
}
