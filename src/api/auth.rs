//! Authentication endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, models::user::AccountType};

use super::AuthenticatedUser;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Plain-text password, verified against the stored argon2 hash
    pub password: String,
}

/// Authenticated user summary
#[derive(Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub account_type: AccountType,
}

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed JWT
    pub token: String,
    /// Always "Bearer"
    pub token_type: String,
    pub user: UserInfo,
}

/// Authenticate and obtain a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user: UserInfo {
            id: user.id,
            username: user.login,
            firstname: user.firstname,
            lastname: user.lastname,
            account_type: user.account_type,
        },
    }))
}

/// Get the authenticated user's identity
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserInfo>> {
    let user = state.services.auth.me(claims.user_id).await?;
    Ok(Json(UserInfo {
        id: user.id,
        username: user.login,
        firstname: user.firstname,
        lastname: user.lastname,
        account_type: user.account_type,
    }))
}
