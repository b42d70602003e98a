//! Book instance endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::instance::{BookInstance, CreateBookInstance, UpdateBookInstance},
};

use super::AuthenticatedUser;

/// List every instance in the library, ordered by status (librarian view)
#[utoipa::path(
    get,
    path = "/instances",
    tag = "instances",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All instances ordered by status", body = Vec<BookInstance>),
        (status = 403, description = "Insufficient permissions")
    )
)]
pub async fn list_instances(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookInstance>>> {
    claims.require_read_loans()?;

    let instances = state.services.loans.list_instances().await?;
    Ok(Json(instances))
}

/// Create a new instance of a book
#[utoipa::path(
    post,
    path = "/books/{id}/instances",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = CreateBookInstance,
    responses(
        (status = 201, description = "Instance created", body = BookInstance),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
    Json(instance): Json<CreateBookInstance>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    claims.require_write_catalog()?;

    let created = state
        .services
        .catalog
        .create_instance(book_id, instance)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an instance (full-record replace)
#[utoipa::path(
    put,
    path = "/instances/{id}",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Instance ID")
    ),
    request_body = UpdateBookInstance,
    responses(
        (status = 200, description = "Instance updated", body = BookInstance),
        (status = 404, description = "Instance not found")
    )
)]
pub async fn update_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(instance): Json<UpdateBookInstance>,
) -> AppResult<Json<BookInstance>> {
    claims.require_write_catalog()?;

    let updated = state.services.catalog.update_instance(id, instance).await?;
    Ok(Json(updated))
}

/// Delete an instance
#[utoipa::path(
    delete,
    path = "/instances/{id}",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Instance ID")
    ),
    responses(
        (status = 204, description = "Instance deleted"),
        (status = 404, description = "Instance not found")
    )
)]
pub async fn delete_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write_catalog()?;

    state.services.catalog.delete_instance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
