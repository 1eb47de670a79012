//! User directory endpoints

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use goalpost::GoalpostError;
use goalpost::storage::traits::UserStore;

use crate::{
    api::{auth::AuthContext, dto::UserDto},
    error::{ServerResult, not_found},
    state::AppState,
};

/// List every user except the caller
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    summary = "List other users",
    responses(
        (status = 200, description = "Users ordered by username", body = Vec<UserDto>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> ServerResult<Json<Vec<UserDto>>> {
    let users = state
        .backend
        .storage()
        .list_users(Some(&auth.user_id))
        .await
        .map_err(GoalpostError::from)?;

    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Get one user's public identity
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    summary = "Get user by ID",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ServerResult<Json<UserDto>> {
    let user = state
        .backend
        .storage()
        .get_user(&user_id)
        .await
        .map_err(GoalpostError::from)?
        .ok_or_else(|| not_found("User", &user_id))?;

    Ok(Json(UserDto::from(user)))
}
