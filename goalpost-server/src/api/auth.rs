//! Authentication for the Goalpost API

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use goalpost::storage::traits::UserStore;
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::ServerError, state::AppState};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username
    pub username: String,
    /// Issued at timestamp
    pub iat: usize,
    /// Expiration timestamp
    pub exp: usize,
}

/// The authenticated caller, inserted into request extensions by
/// [`auth_middleware`]
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID
    pub user_id: String,
    /// Username
    pub username: String,
}

/// User registration request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Username (must be unique)
    pub username: String,
    /// Email (must be unique)
    pub email: String,
    /// Password (at least 8 characters, stored as a bcrypt hash)
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email the account was registered with
    pub email: String,
    /// Password
    pub password: String,
}

/// Authentication response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// JWT token
    pub token: String,
    /// User ID
    pub user_id: String,
    /// Username
    pub username: String,
    /// Token expiration timestamp
    pub expires_at: i64,
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let path = request.uri().path();
    if is_public_endpoint(path) {
        tracing::debug!("Path {} is public, skipping auth", path);
        return Ok(next.run(request).await);
    }

    let auth_header = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| ServerError::Auth("Missing authorization header".to_string()))?;

    let auth_context = validate_jwt_token(auth_header.token(), &state.config.jwt_secret)?;

    // A valid token for a user that no longer exists is rejected as well.
    if state
        .backend
        .storage()
        .get_user(&auth_context.user_id)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .is_none()
    {
        return Err(ServerError::Auth("Unknown user".to_string()));
    }

    request.extensions_mut().insert(auth_context);

    Ok(next.run(request).await)
}

/// Check if an endpoint is public (doesn't require authentication)
fn is_public_endpoint(path: &str) -> bool {
    let path = path.strip_prefix("/api").unwrap_or(path);
    matches!(path, "/health" | "/auth/login" | "/auth/register")
}

/// Validate a JWT token and return the authentication context
pub fn validate_jwt_token(token: &str, secret: &str) -> Result<AuthContext, ServerError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| ServerError::Auth(format!("Invalid token: {}", e)))?;

    if token_data.claims.sub.is_empty() {
        return Err(ServerError::Auth("Invalid user ID in token".to_string()));
    }

    Ok(AuthContext {
        user_id: token_data.claims.sub,
        username: token_data.claims.username,
    })
}

/// Generate a JWT token for a user
pub fn generate_jwt_token(
    user_id: &str,
    username: &str,
    secret: &str,
    expiration_hours: u64,
) -> Result<(String, i64), ServerError> {
    let now = chrono::Utc::now().timestamp() as usize;
    let exp = now + (expiration_hours * 3600) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: now,
        exp,
    };

    let encoding_key = EncodingKey::from_secret(secret.as_ref());
    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| ServerError::Internal(format!("Failed to generate token: {}", e)))?;

    Ok((token, exp as i64))
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, ServerError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ServerError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServerError> {
    bcrypt::verify(password, hash)
        .map_err(|e| ServerError::Internal(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_endpoints() {
        assert!(is_public_endpoint("/health"));
        assert!(is_public_endpoint("/auth/login"));
        assert!(is_public_endpoint("/auth/register"));
        assert!(!is_public_endpoint("/friends"));
        assert!(!is_public_endpoint("/goals/shared"));
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn token_carries_the_caller() {
        let (token, expires_at) = generate_jwt_token("u1", "alice", "secret", 1).unwrap();
        assert!(expires_at > chrono::Utc::now().timestamp());

        let context = validate_jwt_token(&token, "secret").unwrap();
        assert_eq!(context.user_id, "u1");
        assert_eq!(context.username, "alice");

        assert!(validate_jwt_token(&token, "other").is_err());
        assert!(validate_jwt_token("not-a-token", "secret").is_err());
    }
}
