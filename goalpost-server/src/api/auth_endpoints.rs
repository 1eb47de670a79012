//! Registration and login endpoints

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use goalpost::models::NewUser;
use goalpost::storage::traits::UserStore;

use crate::{
    api::auth::{
        AuthResponse, LoginRequest, MIN_PASSWORD_LENGTH, RegisterRequest, generate_jwt_token,
        hash_password, verify_password,
    },
    error::{ServerError, bad_request},
    state::AppState,
};

fn issue_token(state: &AppState, user_id: &str, username: &str) -> Result<AuthResponse, ServerError> {
    let (token, expires_at) = generate_jwt_token(
        user_id,
        username,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(AuthResponse {
        token,
        user_id: user_id.to_string(),
        username: username.to_string(),
        expires_at,
    })
}

/// User registration endpoint
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    summary = "Register a new user account",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid request data or username/email taken", body = crate::error::ErrorResponse),
        (status = 403, description = "Signup disabled", body = crate::error::ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    if !state.config.allow_signup {
        return Err(ServerError::Forbidden("User signup is disabled".to_string()));
    }

    let username = request.username.trim();
    let email = request.email.trim();

    if username.is_empty() {
        return Err(bad_request("Username cannot be empty"));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(bad_request("A valid email is required"));
    }
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(bad_request("Password must be at least 8 characters"));
    }

    let password_hash = hash_password(&request.password)?;

    let user = state
        .backend
        .storage()
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await
        .map_err(goalpost::GoalpostError::from)?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    let response = issue_token(&state, &user.id, &user.username)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// User login endpoint
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    summary = "Authenticate user and get JWT token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid request data", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
        (status = 404, description = "No account for that email", body = crate::error::ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ServerError> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(bad_request("Email and password are required"));
    }

    let user = state
        .backend
        .storage()
        .find_user_by_email(email)
        .await
        .map_err(goalpost::GoalpostError::from)?
        .ok_or_else(|| ServerError::NotFound(format!("No account registered for '{}'", email)))?;

    if !verify_password(&request.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login with wrong password");
        return Err(ServerError::Auth("Invalid credentials".to_string()));
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(issue_token(&state, &user.id, &user.username)?))
}
