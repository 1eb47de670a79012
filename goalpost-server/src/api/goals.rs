//! Goal endpoints

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use goalpost::goals::NewGoal;

use crate::{
    api::{
        auth::AuthContext,
        dto::{CreateGoalRequest, GoalDto, MessageResponse, ShareGoalRequest},
    },
    error::{ServerError, ServerResult},
    state::AppState,
};

fn required(value: Option<String>, field: &str) -> ServerResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ServerError::Validation(format!("{} is required", field)))
}

/// List the caller's goals
#[utoipa::path(
    get,
    path = "/api/goals",
    tag = "goals",
    responses(
        (status = 200, description = "Goals owned by the caller", body = Vec<GoalDto>),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> ServerResult<Json<Vec<GoalDto>>> {
    let goals = state.backend.goals().list_goals(&auth.user_id).await?;
    Ok(Json(goals.into_iter().map(GoalDto::from).collect()))
}

/// Create a goal
#[utoipa::path(
    post,
    path = "/api/goals",
    tag = "goals",
    request_body = CreateGoalRequest,
    responses(
        (status = 201, description = "Goal created", body = GoalDto),
        (status = 400, description = "Missing title, description or deadline", body = crate::error::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateGoalRequest>,
) -> ServerResult<(StatusCode, Json<GoalDto>)> {
    let goal = NewGoal {
        title: required(request.title, "title")?,
        description: required(request.description, "description")?,
        deadline: request
            .deadline
            .ok_or_else(|| ServerError::Validation("deadline is required".to_string()))?,
    };

    let goal = state.backend.goals().add_goal(&auth.user_id, goal).await?;
    Ok((StatusCode::CREATED, Json(goal.into())))
}

/// Goals friends have shared with the caller
#[utoipa::path(
    get,
    path = "/api/goals/shared",
    tag = "goals",
    responses(
        (status = 200, description = "Goals shared with the caller", body = Vec<GoalDto>),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_shared_goals(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> ServerResult<Json<Vec<GoalDto>>> {
    let goals = state.backend.goals().list_shared_goals(&auth.user_id).await?;
    Ok(Json(goals.into_iter().map(GoalDto::from).collect()))
}

/// Get a goal the caller owns or that was shared with them
#[utoipa::path(
    get,
    path = "/api/goals/{id}",
    tag = "goals",
    params(
        ("id" = String, Path, description = "Goal ID")
    ),
    responses(
        (status = 200, description = "Goal", body = GoalDto),
        (status = 404, description = "Goal not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(goal_id): Path<String>,
) -> ServerResult<Json<GoalDto>> {
    let goal = state.backend.goals().get_goal(&auth.user_id, &goal_id).await?;
    Ok(Json(goal.into()))
}

/// Share one of the caller's goals with a friend
#[utoipa::path(
    post,
    path = "/api/goals/{id}/share",
    tag = "goals",
    params(
        ("id" = String, Path, description = "Goal ID")
    ),
    request_body = ShareGoalRequest,
    responses(
        (status = 200, description = "Goal shared", body = GoalDto),
        (status = 400, description = "Missing friend id or not a friend", body = crate::error::ErrorResponse),
        (status = 404, description = "Goal not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn share_goal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(goal_id): Path<String>,
    Json(request): Json<ShareGoalRequest>,
) -> ServerResult<Json<GoalDto>> {
    let friend_id = required(request.friend_id, "friend_id")?;
    let goal = state
        .backend
        .goals()
        .share_goal(&auth.user_id, &goal_id, &friend_id)
        .await?;
    Ok(Json(goal.into()))
}

/// Delete one of the caller's goals
#[utoipa::path(
    delete,
    path = "/api/goals/{id}",
    tag = "goals",
    params(
        ("id" = String, Path, description = "Goal ID")
    ),
    responses(
        (status = 200, description = "Goal deleted", body = MessageResponse),
        (status = 404, description = "Goal not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(goal_id): Path<String>,
) -> ServerResult<Json<MessageResponse>> {
    state.backend.goals().delete_goal(&auth.user_id, &goal_id).await?;
    Ok(Json(MessageResponse::new("Goal deleted")))
}
