//! API implementation for the Goalpost HTTP server

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    response::Json,
    routing::{delete, get, post, put},
};
use goalpost::storage::traits::BaseStore;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod auth;
pub mod auth_endpoints;
pub mod dto;
pub mod friends;
pub mod goals;
pub mod users;

use auth::auth_middleware;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        auth_endpoints::register,
        auth_endpoints::login,
        users::list_users,
        users::get_user,
        friends::get_friends,
        friends::send_request,
        friends::accept_request,
        friends::dismiss_request,
        friends::remove_friend,
        goals::list_goals,
        goals::create_goal,
        goals::list_shared_goals,
        goals::get_goal,
        goals::share_goal,
        goals::delete_goal,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            dto::UserDto,
            dto::FriendshipDto,
            dto::PendingRequestDto,
            dto::FriendsViewDto,
            dto::FriendRequestBody,
            dto::GoalDto,
            dto::CreateGoalRequest,
            dto::ShareGoalRequest,
            dto::MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "User directory"),
        (name = "friends", description = "Friend requests and friendships"),
        (name = "goals", description = "Goals and sharing with friends"),
    ),
    info(
        title = "Goalpost API",
        version = "1.0.0",
        description = "Goal tracking with friends: accounts, friend requests, friendships and shared goals.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api", description = "API base path")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the main router with all API endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        // Public endpoints, skipped by the auth middleware
        .route("/health", get(health_check))
        .route("/auth/register", post(auth_endpoints::register))
        .route("/auth/login", post(auth_endpoints::login))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user))
        // Friends
        .route("/friends", get(friends::get_friends))
        .route("/friends/request", post(friends::send_request))
        .route("/friends/accept/{request_id}", put(friends::accept_request))
        .route(
            "/friends/requests/{request_id}",
            delete(friends::dismiss_request),
        )
        .route("/friends/{friend_id}", delete(friends::remove_friend))
        // Goals
        .route("/goals", get(goals::list_goals).post(goals::create_goal))
        .route("/goals/shared", get(goals::list_shared_goals))
        .route(
            "/goals/{id}",
            get(goals::get_goal).delete(goals::delete_goal),
        )
        .route("/goals/{id}/share", post(goals::share_goal))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    let swagger_router = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new().nest("/api", api_router).merge(swagger_router)
}

/// Wrap the router with the HTTP layers configured for this server:
/// request tracing, CORS and the request body limit.
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = match state
        .config
        .cors_origin
        .as_deref()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
    {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };
    let body_limit = RequestBodyLimitLayer::new(state.config.max_request_size);

    create_router(state)
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = serde_json::Value),
        (status = 503, description = "Storage is unreachable", body = serde_json::Value)
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let storage_ok = state
        .backend
        .storage()
        .health_check()
        .await
        .unwrap_or(false);

    let status = if storage_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if storage_ok { "OK" } else { "DEGRADED" },
            "version": goalpost::VERSION,
            "signup_enabled": state.config.allow_signup,
        })),
    )
}
