//! Error handling for the Goalpost server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use goalpost::GoalpostError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    /// Goalpost library error
    #[error("{0}")]
    Goalpost(#[from] GoalpostError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Operation not permitted by server policy
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::Validation(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Goalpost(err) => match err {
                GoalpostError::NotFound(_) => StatusCode::NOT_FOUND,
                GoalpostError::Conflict(_) | GoalpostError::Validation(_) => {
                    StatusCode::BAD_REQUEST
                }
                GoalpostError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Goalpost(err) => match err {
                GoalpostError::NotFound(_) => "not_found",
                GoalpostError::Conflict(_) => "conflict",
                GoalpostError::Unauthorized(_) => "authentication_error",
                GoalpostError::Validation(_) => "validation_error",
                GoalpostError::Storage(_) => "storage_error",
                _ => "internal_error",
            },
            ServerError::Auth(_) => "authentication_error",
            ServerError::Forbidden(_) => "forbidden",
            ServerError::Validation(_) => "validation_error",
            ServerError::NotFound(_) => "not_found",
            ServerError::BadRequest(_) => "bad_request",
            ServerError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let error_response = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Helper function to create a not found error
pub fn not_found(resource: &str, id: &str) -> ServerError {
    ServerError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Helper function to create a bad request error
pub fn bad_request(message: &str) -> ServerError {
    ServerError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (GoalpostError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (GoalpostError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (GoalpostError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (GoalpostError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (GoalpostError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status_code(), status);
        }
    }

    #[test]
    fn server_errors_map_to_statuses() {
        assert_eq!(ServerError::Auth("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(not_found("User", "1").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServerError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
    }
}
