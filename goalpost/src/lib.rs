//! # Goalpost
//!
//! Goal tracking with friends. This crate holds everything below the HTTP
//! layer: persistent storage for users, goals and friendships, the
//! friendship state machine, the caller-relative friends view and goal
//! sharing between friends.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use goalpost::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ConfigBuilder::new().with_memory_storage().build()?;
//!     let backend = init(config).await?;
//!
//!     let view = backend.friends().friends_view("some-user-id").await?;
//!     assert!(view.accepted_friends.is_empty());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **storage**: SurrealDB-backed stores behind the `AppStore` trait object
//! - **friends**: request/accept/reject/remove transitions and the friends view
//! - **goals**: goal CRUD and sharing with accepted friends
//! - **core**: the `Backend` handle that wires the managers to one store
//!
//! Every operation takes the authenticated caller id as an explicit argument.
//! Verifying who the caller is belongs to the service crate.

pub mod config;
pub mod core;
pub mod friends;
pub mod goals;
pub mod logging;
pub mod models;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::{init, init_with_defaults};

    pub use crate::config::{ConfigBuilder, GoalpostConfig, LogFormat, LogLevel, StorageConfig};

    pub use crate::core::Backend;

    pub use crate::friends::{FriendRequestTarget, FriendsView, FriendshipManager};

    pub use crate::goals::{GoalManager, NewGoal};

    pub use crate::models::{Friendship, FriendshipStatus, Goal, NewUser, PublicUser, User};

    pub use crate::storage::StorageError;

    pub use crate::{GoalpostError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Goalpost operations
#[derive(Debug, thiserror::Error)]
pub enum GoalpostError {
    /// A user, goal, request or friendship does not exist (or is not visible to the caller)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation collides with existing state, e.g. a duplicate friend request
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller is not allowed to perform the operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A required identifier or field is missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error during storage operations
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),

    /// Other unclassified errors
    #[error("{0}")]
    Other(String),
}

impl GoalpostError {
    /// Shorthand for a not-found error on a named resource
    pub fn not_found(resource: &str, id: &str) -> Self {
        GoalpostError::NotFound(format!("{} '{}' not found", resource, id))
    }
}

impl From<crate::config::ConfigError> for GoalpostError {
    fn from(err: crate::config::ConfigError) -> Self {
        GoalpostError::Configuration(err.to_string())
    }
}

/// Result type for Goalpost operations
pub type Result<T> = std::result::Result<T, GoalpostError>;

/// Initialize Goalpost with default configuration
///
/// Uses the on-disk store under the platform data directory.
pub async fn init_with_defaults() -> Result<core::Backend> {
    let config = config::ConfigBuilder::new().build()?;
    init(config).await
}

/// Initialize Goalpost with the provided configuration
///
/// Sets up logging, connects the storage backend (creating the schema if
/// needed) and returns a [`core::Backend`] wired to it.
///
/// # Examples
///
/// ```rust,no_run
/// use goalpost::prelude::*;
///
/// async fn example() -> Result<()> {
///     let config = ConfigBuilder::testing().build()?;
///     let backend = init(config).await?;
///     let goals = backend.goals().list_goals("user-id").await?;
///     assert!(goals.is_empty());
///     Ok(())
/// }
/// ```
pub async fn init(config: config::GoalpostConfig) -> Result<core::Backend> {
    // Ignore errors if tracing is already initialized
    let _ = logging::init(&config.logging);

    let storage = storage::create_storage_service(&config)
        .await
        .map_err(|e| GoalpostError::Storage(e.to_string()))?;

    Ok(core::Backend::new(std::sync::Arc::from(storage), config))
}
