//! Friend request and friendship endpoints

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use goalpost::friends::FriendRequestTarget;

use crate::{
    api::{
        auth::AuthContext,
        dto::{FriendRequestBody, FriendsViewDto, FriendshipDto, MessageResponse},
    },
    error::{ServerError, ServerResult},
    state::AppState,
};

/// The caller's friends, incoming requests and sent requests
#[utoipa::path(
    get,
    path = "/api/friends",
    tag = "friends",
    summary = "Get the friends view",
    responses(
        (status = 200, description = "Accepted friends and pending requests", body = FriendsViewDto),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_friends(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> ServerResult<Json<FriendsViewDto>> {
    let view = state.backend.friends().friends_view(&auth.user_id).await?;
    Ok(Json(view.into()))
}

/// Send a friend request
#[utoipa::path(
    post,
    path = "/api/friends/request",
    tag = "friends",
    summary = "Send a friend request by user id or username",
    request_body = FriendRequestBody,
    responses(
        (status = 201, description = "Request created", body = FriendshipDto),
        (status = 400, description = "Missing target, self request or existing relationship", body = crate::error::ErrorResponse),
        (status = 404, description = "Target user not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_request(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<FriendRequestBody>,
) -> ServerResult<(StatusCode, Json<FriendshipDto>)> {
    let target = FriendRequestTarget::from_parts(body.friend_id, body.username)
        .ok_or_else(|| ServerError::Validation("friend_id or username is required".to_string()))?;

    let request = state
        .backend
        .friends()
        .send_request(&auth.user_id, target)
        .await?;

    Ok((StatusCode::CREATED, Json(request.into())))
}

/// Accept a pending request addressed to the caller
#[utoipa::path(
    put,
    path = "/api/friends/accept/{request_id}",
    tag = "friends",
    summary = "Accept a friend request",
    params(
        ("request_id" = String, Path, description = "Friend request ID")
    ),
    responses(
        (status = 200, description = "Request accepted", body = FriendshipDto),
        (status = 400, description = "Request is no longer pending", body = crate::error::ErrorResponse),
        (status = 404, description = "No such request addressed to the caller", body = crate::error::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn accept_request(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(request_id): Path<String>,
) -> ServerResult<Json<FriendshipDto>> {
    let accepted = state
        .backend
        .friends()
        .accept_request(&auth.user_id, &request_id)
        .await?;

    Ok(Json(accepted.into()))
}

/// Reject a request addressed to the caller, or cancel one the caller sent
#[utoipa::path(
    delete,
    path = "/api/friends/requests/{request_id}",
    tag = "friends",
    summary = "Reject or cancel a pending friend request",
    params(
        ("request_id" = String, Path, description = "Friend request ID")
    ),
    responses(
        (status = 200, description = "Request removed", body = MessageResponse),
        (status = 404, description = "No such pending request for the caller", body = crate::error::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn dismiss_request(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(request_id): Path<String>,
) -> ServerResult<Json<MessageResponse>> {
    state
        .backend
        .friends()
        .dismiss_request(&auth.user_id, &request_id)
        .await?;

    Ok(Json(MessageResponse::new("Friend request removed")))
}

/// End a friendship
#[utoipa::path(
    delete,
    path = "/api/friends/{friend_id}",
    tag = "friends",
    summary = "Remove a friend",
    params(
        ("friend_id" = String, Path, description = "User ID of the friend")
    ),
    responses(
        (status = 200, description = "Friendship removed", body = MessageResponse),
        (status = 404, description = "Not friends", body = crate::error::ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_friend(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(friend_id): Path<String>,
) -> ServerResult<Json<MessageResponse>> {
    state
        .backend
        .friends()
        .remove_friendship(&auth.user_id, &friend_id)
        .await?;

    Ok(Json(MessageResponse::new("Friend removed")))
}
